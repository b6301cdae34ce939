use crate::cli::commands::RootArgs;
use crate::errors::ReconError;
use crate::utils::get_root_domain;

pub fn handle_root(args: RootArgs) -> Result<(), ReconError> {
    let root = get_root_domain(&args.input)
        .ok_or_else(|| ReconError::InvalidTarget(format!("'{}' is not a domain", args.input)))?;
    println!("{}", root);
    Ok(())
}
