//! Interactive session loop
//!
//! Reads one command per line, dispatches it against the [`Session`] and
//! reprints the catalog. Playing a selection blocks until the whole queue
//! has drained; Ctrl-C is the only way out of a long queue.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::cli::Output;
use crate::command::{self, ReplCommand};
use crate::commands::{format_rows, render_formats};
use crate::models::render_listing;
use crate::session::{DrainEvent, Session, SessionError};
use crate::stream::{ProcessRunner, Resolution};

/// Help shown for `h`
pub fn help_text() -> String {
    format!(
        "invidplay\n\
         Version {}\n\
         <n> to play the song <n>\n\
         <n>-<m> to play the song from <n> to <m>\n\
         2-5,8 to play the songs 2,3,4,5,8\n\
         i<n> to see the info of the song <n>\n\
         d<n> to download the song <n>\n\
         /<text> to search\n\
         q to exit",
        env!("CARGO_PKG_VERSION")
    )
}

/// `[k/n]` counter for the entry at `position` (zero based)
fn progress(position: usize, remaining: usize) -> String {
    format!("Playing [{}/{}]", position + 1, position + 1 + remaining)
}

fn prompt(has_catalog: bool) -> String {
    let mut text = String::new();
    if has_catalog {
        text.push_str("Type a number 'n' or range 'n-m' to play songs. ");
    }
    text.push_str("Type 'h' for help. To search a song, type '/songname'. 'q' to exit\n> ");
    text
}

/// Read one line; `None` on end of input
fn read_line<I: BufRead>(input: &mut I) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Run the interactive loop until `q` or end of input
pub async fn run<R, I>(session: &mut Session<R>, input: &mut I, output: &Output) -> Result<()>
where
    R: ProcessRunner,
    I: BufRead,
{
    loop {
        print!("{}", prompt(!session.catalog().is_empty()));
        std::io::stdout().flush()?;

        let Some(line) = read_line(input)? else {
            break;
        };

        let cmd = match command::parse(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                output.warn(e);
                continue;
            }
        };

        if cmd.needs_catalog() && session.catalog().is_empty() {
            output.warn(SessionError::NoCatalog);
            continue;
        }

        match cmd {
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            ReplCommand::Help => println!("{}", help_text()),
            ReplCommand::Search(query) => {
                if let Err(e) = session.search(&query).await {
                    output.warn(format!("Search failed: {}", e));
                }
            }
            ReplCommand::Info(index) => show_info(session, index, input, output).await?,
            ReplCommand::Download(index) => download(session, index, input, output).await?,
            ReplCommand::PlaySelection(expr) => play_selection(session, &expr, output).await,
        }

        if !session.catalog().is_empty() {
            println!("{}", render_listing(session.catalog().iter()));
        }
    }

    Ok(())
}

async fn show_info<R, I>(
    session: &Session<R>,
    index: usize,
    input: &mut I,
    output: &Output,
) -> Result<()>
where
    R: ProcessRunner,
    I: BufRead,
{
    match session.fetch_entry(index).await {
        Ok(video) => {
            println!("{}", video.details());
            println!("Press enter to continue");
            read_line(input)?;
        }
        Err(e) => output.warn(format!("Info failed: {}", e)),
    }
    Ok(())
}

async fn download<R, I>(
    session: &Session<R>,
    index: usize,
    input: &mut I,
    output: &Output,
) -> Result<()>
where
    R: ProcessRunner,
    I: BufRead,
{
    let video = match session.fetch_entry(index).await {
        Ok(video) => video,
        Err(e) => {
            output.warn(format!("Lookup failed: {}", e));
            return Ok(());
        }
    };

    println!("Available formats:");
    println!("{}", render_formats(&format_rows(&video, false)));

    let Some(choice) = read_line(input)? else {
        return Ok(());
    };
    let format_index: usize = match choice.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            output.warn(format!("'{}' is not a format number", choice.trim()));
            return Ok(());
        }
    };

    if let Some(format) = video.formats.get(format_index) {
        output.info(format.mime_type.as_str());
    }
    output.info(format!(
        "Using downloader {} into {}",
        session.downloader().program(),
        session.downloader().output_dir().display()
    ));

    match session.download(&video, format_index).await {
        Ok(path) => println!("Saved {}", path.display()),
        Err(e) => output.warn(format!("Download failed: {}", e)),
    }
    Ok(())
}

async fn play_selection<R: ProcessRunner>(session: &Session<R>, expr: &str, output: &Output) {
    let (queue, expansion) = session.queue_selection(expr);
    for diagnostic in &expansion.diagnostics {
        output.warn(diagnostic);
    }
    if queue.is_empty() {
        return;
    }

    println!("Queue");
    println!("{}", queue.listing());
    println!("Playing Queue. To exit from the queue, you have to close the program with Ctrl-C");
    output.info(format!("Using player {}", session.player().player_type()));

    session
        .drain(queue, |event| match event {
            DrainEvent::Starting {
                position,
                remaining,
                video,
            } => println!("{} {}", progress(position, remaining), video.title),
            DrainEvent::LookupFailed { video, error } => {
                output.warn(format!("Skipping {}: {}", video.title, error))
            }
            DrainEvent::Finished { video, resolution } => match resolution {
                Resolution::Played { .. } => {}
                Resolution::NoEligibleFormats => {
                    output.warn(format!("{} has no audio formats", video.title))
                }
                Resolution::Exhausted { failed } => output.warn(format!(
                    "All {} audio formats of {} failed",
                    failed.len(),
                    video.title
                )),
            },
        })
        .await;
}
