use crate::cmd::device::connect;
use crate::cmd::{ConnectionArgs, RawArgs};
use crate::exit::{controller_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: RawArgs, connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let controller = connect(connection)?;
    let response = controller
        .request(&args.name, &args.params)
        .map_err(|err| controller_error(&args.name, err))?;
    print_response(&response, format);
    Ok(SUCCESS)
}
