use crate::cli::commands::{GlobalOpts, HistoryArgs};
use crate::cli::context::{load_config, open_store};
use crate::cli::output::{print_history_item, print_history_table};
use crate::db::HistoryStore;
use crate::errors::ReconError;
use crate::utils::get_root_domain;

pub async fn handle_history(args: HistoryArgs, global: GlobalOpts) -> Result<(), ReconError> {
    let config = load_config(&global).await?;
    let store = open_store(&global, &config)?;

    if let Some(domain) = &args.domain {
        let root = get_root_domain(domain)
            .ok_or_else(|| ReconError::InvalidTarget(format!("'{}' is not a domain", domain)))?;
        let item = store
            .history_for(&root)?
            .ok_or_else(|| ReconError::InvalidTarget(format!("No history for {}", root)))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&item)?);
        } else {
            print_history_item(&item);
        }
        return Ok(());
    }

    let mut items = store.load_history()?;
    items.truncate(args.limit);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_history_table(&items);
    }
    Ok(())
}
