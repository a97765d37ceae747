use crate::cli::{Command, SearchFlags};
use anyhow::{Context, bail};
use padfind::config::RcConfig;
use padfind::view::MatchListView;
use padfind::{Document, LineEnding, Navigation, SearchSession};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn run(
    command: &Command,
    config: &RcConfig,
    view: MatchListView,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Find {
            file,
            pattern,
            flags,
            from,
            prev,
            no_wrap,
            no_color,
        } => {
            let mut document = open(file, config)?;
            document.set_caret(*from);

            let mut session = SearchSession::new();
            session.wrap_around = config.wrap_around && !no_wrap;
            session.set_query(pattern.as_str(), flags.apply(config.search_options()));

            let navigation = if *prev {
                session.find_previous(&mut document)?
            } else {
                session.find_next(&mut document)?
            };

            let current = match navigation {
                Navigation::Found { index, .. } => Some(index),
                Navigation::Exhausted | Navigation::NoMatches => None,
            };
            let view = MatchListView::new(view.width, view.color && !no_color);
            for row in view.render(document.lines(), session.matches(), current) {
                writeln!(out, "{row}")?;
            }

            if let Navigation::Found { wrapped: true, .. } = navigation {
                let edge = if *prev { "end" } else { "beginning" };
                writeln!(out, "Search wrapped to {edge}")?;
            }
            writeln!(out, "{}", session.status())?;
        }

        Command::Replace {
            file,
            pattern,
            replacement,
            flags,
            in_place,
        } => {
            let mut document = open(file, config)?;
            let count = replace_all(&mut document, pattern, replacement, *flags, config)?;
            info!(count, file = %file.display(), "replaced matches");

            if *in_place {
                if document.is_modified() {
                    fs::write(file, document.text())
                        .with_context(|| format!("could not write {}", file.display()))?;
                    document.mark_saved();
                }
                writeln!(out, "Replaced {count} occurrence(s) in {}", document.file_name())?;
            } else {
                write!(out, "{}", document.text())?;
            }
        }

        Command::Position {
            file,
            offset,
            line,
            column,
        } => {
            let mut document = open(file, config)?;
            let offset = match (offset, line, column) {
                (Some(offset), _, _) => *offset,
                (None, Some(line), Some(column)) => document.offset_at_position(*line, *column),
                _ => bail!("either --offset or --line with --column is required"),
            };

            document.set_caret(offset);
            writeln!(
                out,
                "offset={} line={} column={} lines={} text={:?}",
                document.caret_index(),
                document.current_line_number(),
                document.caret_column_index(),
                document.total_lines(),
                document.current_line_text()
            )?;
        }
    }

    Ok(())
}

fn open(path: &Path, config: &RcConfig) -> anyhow::Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let line_ending = config
        .line_ending
        .unwrap_or_else(|| LineEnding::detect(&text));
    let mut document = Document::from_text(text, line_ending);
    document.file_path = Some(path.to_path_buf());
    Ok(document)
}

fn replace_all(
    document: &mut Document,
    pattern: &str,
    replacement: &str,
    flags: SearchFlags,
    config: &RcConfig,
) -> anyhow::Result<usize> {
    let mut session = SearchSession::new();
    session.set_query(pattern, flags.apply(config.search_options()));
    Ok(session.replace_all(document, replacement)?)
}
