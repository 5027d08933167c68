//! Site command handlers.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};

use sitewatch_core::{
    Dashboard, FetchOutcome, MutationOutcome, NewSite, SiteCommand, SiteFilter, SiteId,
    SiteStatus, StatusFilter, ViewFrame,
};

use crate::cli::{FilterArgs, GlobalOpts, SitesArgs, SitesCommand, StatusArg};
use crate::error::CliError;
use crate::output;

use super::util::{self, TerminalConfirm};

pub async fn handle(
    dashboard: &Dashboard,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List(filter) => list(dashboard, &filter, global).await,
        SitesCommand::Watch { filter, interval } => {
            watch(dashboard, &filter, interval, global).await
        }

        SitesCommand::Create { name, address } => {
            let outcome = dashboard
                .coordinator()
                .create(NewSite::new(name, address))
                .await?;
            finish(outcome, global, true).await
        }

        SitesCommand::Delete { id } => {
            let confirm = TerminalConfirm::new(global, "delete")?;
            // Load first so the prompt can name the site.
            ensure_loaded(dashboard, global).await?;
            let outcome = dashboard
                .execute(SiteCommand::Delete { id: SiteId::new(id) }, &confirm)
                .await?;
            finish(outcome, global, false).await
        }

        SitesCommand::Associate { id } => {
            let outcome = dashboard
                .coordinator()
                .associate(&SiteId::new(id))
                .await?;
            finish(outcome, global, true).await
        }

        SitesCommand::Refresh => {
            let pb = util::spinner("Refreshing sites…", global);
            let outcome = dashboard.refresh().wait().await;
            pb.finish_and_clear();
            match outcome {
                FetchOutcome::Applied { count, .. } => {
                    if !global.quiet {
                        eprintln!("Loaded {count} sites");
                    }
                    Ok(())
                }
                FetchOutcome::Failed { error, .. } => Err(error.into()),
                FetchOutcome::Superseded { .. } | FetchOutcome::Detached { .. } => Ok(()),
            }
        }
    }
}

fn filter_from(args: &FilterArgs) -> SiteFilter {
    let status = match args.status {
        StatusArg::All => StatusFilter::All,
        StatusArg::Online => StatusFilter::Only(SiteStatus::Online),
        StatusArg::Offline => StatusFilter::Only(SiteStatus::Offline),
        StatusArg::Warning => StatusFilter::Only(SiteStatus::Warning),
        StatusArg::Pending => StatusFilter::Only(SiteStatus::Pending),
    };
    SiteFilter::new(args.search.as_str(), status)
}

/// Wait for the first load. Fails only if nothing could ever be loaded.
async fn ensure_loaded(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let pb = util::spinner("Loading sites…", global);
    let outcome = dashboard.cache().load().wait().await;
    pb.finish_and_clear();

    match outcome {
        FetchOutcome::Failed { error, .. } if !dashboard.sites().loaded() => Err(error.into()),
        _ => Ok(()),
    }
}

async fn list(dashboard: &Dashboard, args: &FilterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    ensure_loaded(dashboard, global).await?;
    let view = dashboard.view(filter_from(args));
    print_frame(&view.frame(), global, false)
}

async fn watch(
    dashboard: &Dashboard,
    args: &FilterArgs,
    interval: u64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut view = dashboard.view(filter_from(args));
    let redraw = io::stdout().is_terminal();
    print_frame(&view.frame(), global, redraw)?;

    // Periodic refetch; the first tick fires immediately and is skipped.
    let mut ticker = (interval > 0).then(|| {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    if let Some(ticker) = ticker.as_mut() {
        ticker.tick().await;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            frame = view.changed() => match frame {
                Some(frame) => print_frame(&frame, global, redraw)?,
                None => break,
            },
            () = tick(ticker.as_mut()) => {
                tracing::debug!(interval, "periodic refresh");
                drop(dashboard.refresh());
            }
            _ = &mut ctrl_c => {
                tracing::debug!("watch interrupted");
                break;
            }
        }
    }
    Ok(())
}

async fn tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn print_frame(frame: &ViewFrame, global: &GlobalOpts, redraw: bool) -> Result<(), CliError> {
    if redraw {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\x1b[2J\x1b[H");
    }
    let out = output::render_frame(&global.output, frame)?;
    output::print_output(&out, global.quiet);
    if let Some(line) = output::frame_status_line(frame, output::stderr_color(&global.color)) {
        eprintln!("{line}");
    }
    Ok(())
}

/// Report a mutation outcome and wait for the follow-up refresh.
async fn finish(
    outcome: MutationOutcome,
    global: &GlobalOpts,
    print_site: bool,
) -> Result<(), CliError> {
    match outcome.settled().await {
        MutationOutcome::Applied { site, .. } => {
            if let Some(site) = site.filter(|_| print_site) {
                let color = output::stdout_color(&global.color);
                let out = output::render_site(&global.output, &site, color)?;
                output::print_output(&out, global.quiet);
            }
        }
        MutationOutcome::Declined => {
            if !global.quiet {
                eprintln!("Aborted.");
            }
        }
        MutationOutcome::Skipped { reason } => {
            if !global.quiet {
                eprintln!("Nothing to do: {reason}");
            }
        }
    }
    Ok(())
}
