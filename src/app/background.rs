//! Background task handling.
//!
//! Channel sends use `let _ =`: if the receiver is gone the app is
//! shutting down and nobody is listening for the result anyway.
//!
//! Every remote call is wrapped here and reported back as a
//! `BackgroundMessage` carrying its request token; the drain loop applies
//! results only when the token still matches the live request. The
//! transport is never cancelled - superseded responses simply arrive,
//! fail the token comparison and are dropped.

use crate::app::messages::BackgroundMessage;
use crate::app::RuntimeContext;
use crate::search::SearchCommand;
use crate::session::PlanSubmission;
use crate::ui::App;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use std::time::Instant;

pub fn drain_messages(app: &mut App, rx: &mpsc::Receiver<BackgroundMessage>) {
    while let Ok(msg) = rx.try_recv() {
        match msg {
            BackgroundMessage::CatalogLoaded(response) => {
                app.session.on_catalog_loaded(response);
                app.rebuild_grid();
            }
            BackgroundMessage::CatalogFailed(e) => {
                app.session.on_catalog_failed(&e);
                app.rebuild_grid();
            }
            BackgroundMessage::SearchResults { token, plants } => {
                app.session.on_search_results(token, plants);
            }
            BackgroundMessage::SearchFailed { token, error } => {
                app.session.on_search_failed(token, &error);
            }
            BackgroundMessage::Generated {
                token,
                query,
                record,
            } => {
                if app.session.on_generated(token, &query, record) {
                    app.exit_search();
                    app.rebuild_grid();
                }
            }
            BackgroundMessage::ItemFetched {
                token,
                name,
                record,
            } => {
                if app.session.on_item_fetched(token, &name, record) {
                    app.exit_search();
                    app.rebuild_grid();
                }
            }
            BackgroundMessage::PlanReady { token, plan } => {
                app.session.on_plan_ready(token, plan, Instant::now());
            }
            BackgroundMessage::PlanFailed { token, error } => {
                app.session.on_plan_failed(token, &error);
                app.close_progress_view();
            }
            BackgroundMessage::DocumentSaved(path) => {
                app.downloading = false;
                app.session
                    .notices
                    .success(&format!("Saved {}", path.display()));
            }
            BackgroundMessage::DocumentFailed(e) => {
                app.downloading = false;
                app.session
                    .notices
                    .error(&format!("Download failed: {}. Try again.", e));
            }
            BackgroundMessage::TaskFailed(e) => {
                app.session.notices.error(&e);
            }
        }
    }
}

/// Start the remote operation a `SearchCommand` asks for.
pub fn spawn_search_command(ctx: &RuntimeContext, cmd: SearchCommand) {
    match cmd {
        SearchCommand::RemoteSearch { query, token } => {
            let api = ctx.api.clone();
            let tx = ctx.tx.clone();
            spawn_background(ctx.tx.clone(), "catalog_search", async move {
                match api.search_catalog(&query, false).await {
                    Ok(response) => {
                        let _ = tx.send(BackgroundMessage::SearchResults {
                            token,
                            plants: response.plants,
                        });
                    }
                    Err(e) => {
                        let _ = tx.send(BackgroundMessage::SearchFailed {
                            token,
                            error: e.to_string(),
                        });
                    }
                }
            });
        }
        SearchCommand::Generate { query, token } => {
            let api = ctx.api.clone();
            let tx = ctx.tx.clone();
            spawn_background(ctx.tx.clone(), "plant_generation", async move {
                // Empty result and transport failure read the same to the
                // session: no record, notification names the query.
                let record = match api.search_catalog(&query, true).await {
                    Ok(response) => response.plants.into_iter().next(),
                    Err(_) => None,
                };
                let _ = tx.send(BackgroundMessage::Generated {
                    token,
                    query,
                    record,
                });
            });
        }
        SearchCommand::Fetch { name, token } => {
            let api = ctx.api.clone();
            let tx = ctx.tx.clone();
            spawn_background(ctx.tx.clone(), "plant_fetch", async move {
                let record = api.fetch_item(&name).await.ok().flatten();
                let _ = tx.send(BackgroundMessage::ItemFetched {
                    token,
                    name,
                    record,
                });
            });
        }
    }
}

/// Issue the plan-generation request for an accepted submission.
pub fn spawn_plan_request(ctx: &RuntimeContext, submission: PlanSubmission) {
    let api = ctx.api.clone();
    let tx = ctx.tx.clone();
    let PlanSubmission { token, request } = submission;
    spawn_background(ctx.tx.clone(), "plan_generation", async move {
        match api.generate_plan(&request).await {
            Ok(plan) => {
                let _ = tx.send(BackgroundMessage::PlanReady { token, plan });
            }
            Err(e) => {
                let _ = tx.send(BackgroundMessage::PlanFailed {
                    token,
                    error: e.to_string(),
                });
            }
        }
    });
}

/// Download the plan document to the output directory.
pub fn spawn_document_download(ctx: &RuntimeContext, plan_id: String) {
    let api = ctx.api.clone();
    let tx = ctx.tx.clone();
    let stamp = chrono::Local::now().format("%Y%m%d");
    let path = ctx
        .output_dir
        .join(format!("garden-plan-{}-{}.pdf", plan_id, stamp));
    spawn_background(ctx.tx.clone(), "document_download", async move {
        let result = async {
            let bytes = api.fetch_document(&plan_id).await?;
            tokio::task::spawn_blocking({
                let path = path.clone();
                move || std::fs::write(&path, bytes)
            })
            .await??;
            Ok::<_, anyhow::Error>(path)
        }
        .await;

        match result {
            Ok(path) => {
                let _ = tx.send(BackgroundMessage::DocumentSaved(path));
            }
            Err(e) => {
                let _ = tx.send(BackgroundMessage::DocumentFailed(e.to_string()));
            }
        }
    });
}

pub fn spawn_catalog_load(ctx: &RuntimeContext) {
    let api = ctx.api.clone();
    let tx = ctx.tx.clone();
    spawn_background(ctx.tx.clone(), "catalog_load", async move {
        match api.list_catalog().await {
            Ok(response) => {
                let _ = tx.send(BackgroundMessage::CatalogLoaded(response));
            }
            Err(e) => {
                let _ = tx.send(BackgroundMessage::CatalogFailed(e.to_string()));
            }
        }
    });
}

pub fn spawn_background<F>(
    tx: mpsc::Sender<BackgroundMessage>,
    task_name: &'static str,
    fut: F,
) where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            let _ = tx.send(BackgroundMessage::TaskFailed(format!(
                "Background task '{}' crashed unexpectedly: {}",
                task_name, detail
            )));
        }
    });
}
