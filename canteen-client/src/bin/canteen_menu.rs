//! Print a canteen's menu, filtered and grouped by category.
//!
//! Usage: canteen-menu [CANTEEN] [--search TEXT] [--sort none|a-z|z-a|price|votes] [--veg] [--non-veg]
//!
//! Without a canteen name the available canteens are listed.

use std::sync::Arc;

use anyhow::{Context, bail};
use canteen_client::{
    CanteenController, ClientConfig, FeedHub, RestBackend, Session, SortKey, TracingNotifier,
    logger::init_logger,
};
use chrono::Local;

#[derive(Debug, Default)]
struct Args {
    canteen: Option<String>,
    search: Option<String>,
    sort: SortKey,
    veg: bool,
    non_veg: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--search" => args.search = Some(iter.next().context("--search needs a value")?),
            "--sort" => {
                let key = iter.next().context("--sort needs a value")?;
                args.sort = key.parse().map_err(anyhow::Error::msg)?;
            }
            "--veg" => args.veg = true,
            "--non-veg" => args.non_veg = true,
            flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
            name => args.canteen = Some(name.to_string()),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".into());
    let log_dir = std::env::var("LOG_DIR").ok();
    let _guard = init_logger(&log_level, false, log_dir.as_deref())?;

    let args = parse_args()?;
    let config = ClientConfig::from_env()?;
    let backend = Arc::new(RestBackend::new(&config)?);

    // The REST backend has no push channel; the hub stays quiet
    let controller = CanteenController::new(
        backend,
        Arc::new(FeedHub::with_capacity(config.feed_capacity)),
        Arc::new(Session::new()),
        Arc::new(TracingNotifier),
        config,
    );

    let canteens = controller.load_canteens().await?;
    let now = Local::now().time();

    let Some(wanted) = args.canteen else {
        for canteen in &canteens {
            let status = match canteen.is_open_at(now) {
                Some(true) => "open",
                Some(false) => "closed",
                None => "hours unknown",
            };
            println!("{} ({})", canteen.name, status);
        }
        controller.close().await;
        return Ok(());
    };

    let canteen = canteens
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(&wanted) || c.id == wanted)
        .with_context(|| format!("no canteen named {wanted}"))?;
    controller.select_canteen(&canteen.id).await?;

    if let Some(search) = args.search {
        controller.set_search(search);
    }
    controller.set_sort(args.sort);
    controller.set_veg(args.veg);
    controller.set_non_veg(args.non_veg);

    println!("{}", canteen.name);
    if controller.is_empty_view() {
        println!("  {}", canteen_client::projection::EMPTY_STATE_MESSAGE);
    }
    for group in controller.grouped() {
        let heading = if group.category.is_empty() {
            "Uncategorized"
        } else {
            group.category.as_str()
        };
        println!("\n  {heading}");
        for item in group.items {
            let marker = if item.is_nonveg { "non-veg" } else { "veg" };
            let rating = item
                .curator_rating
                .map(|r| format!("  [{}]", r.label()))
                .unwrap_or_default();
            println!(
                "    {:<32} Rs {:>7}  {:>4} votes  {}{}",
                item.name,
                item.price,
                item.vote_count(),
                marker,
                rating
            );
        }
    }

    controller.close().await;
    Ok(())
}
