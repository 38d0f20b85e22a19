//! Application entry point: a line-oriented terminal view over one session.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime.
//! 4. Build the capability providers from config.
//! 5. Create the [`SessionController`] and its event channel.
//! 6. Spawn the event pump that redraws changed messages.
//! 7. Read stdin until EOF: plain lines are sent, `:` lines are commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use text_processor::config::AppConfig;
use text_processor::language::{flag_key, language_label, SUPPORTED_LANGUAGES};
use text_processor::pipeline::{event_channel, SessionController, SessionEvent};
use text_processor::remote::build_providers;
use text_processor::session::{
    lock_session, Message, SessionState, SummarizeControl, TranslateControl,
};

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(st: &SessionState, message: &Message) -> String {
    let language = match message.language() {
        Some(code) => match flag_key(code) {
            Some(flag) => format!("{} :{flag}:", language_label(code)),
            None => language_label(code),
        },
        None => message.stage().label().to_string(),
    };
    let mut out = format!(
        "[{}] {} ({}) {}",
        message.timestamp(),
        message.id(),
        language,
        message.text()
    );
    if let Some(summary) = message.summary() {
        out.push_str(&format!("\n    summary: {summary}"));
    }
    if let Some(translation) = message.translation() {
        out.push_str(&format!("\n    translation: {translation}"));
    }
    if let Some(error) = message.error() {
        out.push_str(&format!("\n    error: {error}"));
    }
    if message.stage().is_settled() {
        let translate = TranslateControl::for_message(st, message.id());
        let mut controls = vec![control(translate.label, translate.enabled)];
        let summarize = SummarizeControl::for_message(st, message);
        if summarize.visible {
            controls.push(control(summarize.label, summarize.enabled));
        }
        out.push_str(&format!("\n    {}", controls.join(" ")));
    } else if message.stage().is_busy() {
        out.push_str(&format!("\n    {}...", message.stage().label()));
    }
    out
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("[{label} (disabled)]")
    }
}

fn print_message(controller: &SessionController, index: usize) {
    let session = controller.session();
    let st = lock_session(&session);
    if let Ok(message) = st.message_at(index) {
        println!("{}", render(&st, message));
    }
}

fn print_help() {
    let codes: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
    println!("Type a message and press Enter to send it.");
    println!("  :target <code>     set the translation target ({})", codes.join(", "));
    println!("  :translate <n>     translate message #n");
    println!("  :summarize <n>     summarize message #n");
    println!("  :list              show all messages");
    println!("  :quit              exit");
}

/// Redraw whatever the controller reports as changed.
async fn pump_events(
    controller: Arc<SessionController>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::MessageAppended(id) => print_message(&controller, id.index()),
            SessionEvent::MessageUpdated(id) => {
                let visible = controller
                    .messages()
                    .get(id.index())
                    .is_some_and(|m| m.stage().is_settled() || m.stage().is_busy());
                if visible {
                    print_message(&controller, id.index());
                }
            }
            SessionEvent::LoadingChanged(loading) => {
                log::debug!("loading = {loading}");
            }
            SessionEvent::DownloadProgress(update) => {
                println!(
                    "downloading {} model: {:.0}%",
                    update.kind,
                    update.progress.fraction() * 100.0
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn parse_index(arg: Option<&str>) -> Option<usize> {
    arg.map(|a| a.trim_start_matches('#')).and_then(|a| a.parse().ok())
}

/// Handle one input line.  Returns `false` when the user asked to quit.
fn dispatch(controller: &Arc<SessionController>, line: String) -> bool {
    let Some(command) = line.trim().strip_prefix(':') else {
        let controller = Arc::clone(controller);
        tokio::spawn(async move {
            controller.send_message(&line).await;
        });
        return true;
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit"), _) | (Some("q"), _) => return false,
        (Some("list"), _) => {
            for index in 0..controller.messages().len() {
                print_message(controller, index);
            }
        }
        (Some("target"), Some(code)) => match controller.set_target_lang(code) {
            Ok(()) => println!("target language: {}", language_label(&controller.target_lang())),
            Err(e) => println!("{e}"),
        },
        (Some("translate"), arg) => match parse_index(arg) {
            Some(index) => {
                let controller = Arc::clone(controller);
                tokio::spawn(async move {
                    match controller.translate_message(index).await {
                        Ok(outcome) => log::info!("translate #{index}: {outcome:?}"),
                        Err(e) => println!("{e}"),
                    }
                });
            }
            None => println!("usage: :translate <n>"),
        },
        (Some("summarize"), arg) => match parse_index(arg) {
            Some(index) => {
                let controller = Arc::clone(controller);
                tokio::spawn(async move {
                    match controller.summarize_message(index).await {
                        Ok(outcome) => log::info!("summarize #{index}: {outcome:?}"),
                        Err(e) => println!("{e}"),
                    }
                });
            }
            None => println!("usage: :summarize <n>"),
        },
        _ => print_help(),
    }
    true
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("text-processor starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async move {
        // 4. Providers
        let providers = build_providers(&config.provider);

        // 5. Controller
        let (events, events_rx) = event_channel();
        let controller = Arc::new(SessionController::new(providers, &config, events));

        // 6. Event pump
        tokio::spawn(pump_events(Arc::clone(&controller), events_rx));

        // 7. Input loop
        print_help();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            if !dispatch(&controller, line) {
                break;
            }
        }

        log::info!("text-processor shutting down");
        Ok(())
    })
}
