use console::style;

use crate::cli::commands::{GlobalOpts, IgnoreCommand};
use crate::cli::context::{load_config, open_store};
use crate::db::IgnoreStore;
use crate::errors::ReconError;

pub async fn handle_ignore(command: IgnoreCommand, global: GlobalOpts) -> Result<(), ReconError> {
    let config = load_config(&global).await?;
    let store = open_store(&global, &config)?;

    match command {
        IgnoreCommand::Add { domain } => {
            let root = store.add_ignored(&domain)?;
            println!("{} {}", style("Ignoring").green(), root);
        }
        IgnoreCommand::Remove { domain } => {
            if store.remove_ignored(&domain)? {
                println!("{} {}", style("Removed").green(), domain);
            } else {
                println!("{} is not ignored", domain);
            }
        }
        IgnoreCommand::List => {
            let list = store.load_ignore_list()?;
            if list.is_empty() {
                println!("Ignore list is empty.");
            }
            for domain in list {
                println!("{}", domain);
            }
        }
    }
    Ok(())
}
