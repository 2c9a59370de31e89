//! Interactive chat loop.

use std::io::Write;
use std::time::Duration;

use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use novainfor_core::{Assistant, Library, ReplySource};
use novainfor_llm::ModelService;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::display;

const HELP: &str = "Comandos: /reset reinicia la conversación, /data muestra los datos cargados, /quit sale.";

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Input<'a> {
    Empty,
    Reset,
    Data,
    Help,
    Quit,
    Question(&'a str),
}

impl<'a> Input<'a> {
    pub(crate) fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Self::Empty,
            "/reset" | "/reiniciar" => Self::Reset,
            "/data" | "/datos" => Self::Data,
            "/help" | "/ayuda" => Self::Help,
            "/quit" | "/exit" | "/salir" => Self::Quit,
            question => Self::Question(question),
        }
    }
}

/// Read questions from stdin until EOF or `/quit`.
pub(crate) async fn run<M: ModelService>(assistant: &Assistant<M>, library: &Library) -> Result<()> {
    let mut transcript = assistant.new_transcript();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("🤖 {}", transcript.greeting());
    println!("{HELP}");

    loop {
        print!("\n👤 ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Input::parse(&line) {
            Input::Empty => continue,
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Reset => {
                transcript.reset();
                println!("🤖 {}", transcript.greeting());
            }
            Input::Data => {
                for table in &library.tables {
                    print!("{}", display::render_table(table));
                }
            }
            Input::Question(question) => {
                let spinner = Spinner::start("Pensando...");
                let reply = assistant.respond(&mut transcript, question).await;
                spinner.finish();

                if let ReplySource::Matched { score, .. } = &reply.source {
                    debug!(score, "reply taken from interviews");
                }
                println!("🤖 {}", reply.text);
            }
        }
    }

    Ok(())
}

/// Spinner shown while waiting on the model service.
pub(crate) struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub(crate) fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub(crate) fn finish(self) {
        self.bar.finish_and_clear();
    }
}
