/// Run-splitting repair.
///
/// Word frequently fragments one visible string across several runs (spell
/// check marks, revision ids, formatting toggles), so a placeholder typed as
/// `{{name}}` may be stored as the runs `{{`, `na`, `me}}`. This pass
/// tokenizes each paragraph into its runs, slides a bounded window over them
/// looking for a concatenation that completes a placeholder, and collapses
/// the matching window into one synthetic run.
///
/// Only plain text runs take part: a run holding anything besides `w:rPr`
/// and `w:t` (tabs, drawings, fields, nested paragraphs) ends a window. Runs
/// are removed individually, so bookmarks and proofing marks between them
/// survive.
use super::TemplateOptions;
use super::scan::{PLACEHOLDER, normalize_placeholders};
use crate::common::xml::{escape_xml, resolve_entity};
use crate::common::{Error, Result};
use memchr::memmem;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::ops::Range;

/// One closed `w:r` element of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSpan {
    /// Byte range of the whole run element
    pub range: Range<usize>,
    /// Byte range of its `w:rPr`, if any
    pub rpr: Option<Range<usize>>,
    /// Decoded text of its `w:t` children
    pub text: String,
    /// Namespace prefix of the run element (`w` in `w:r`)
    pub prefix: String,
    /// Whether the run holds only properties and text
    pub mergeable: bool,
}

#[derive(Debug)]
struct OpenRun {
    start: usize,
    depth: usize,
    rpr_start: Option<usize>,
    rpr: Option<Range<usize>>,
    text: String,
    prefix: String,
    mergeable: bool,
    in_text: bool,
}

#[derive(Debug, Default)]
struct ParagraphFrame {
    runs: Vec<RunSpan>,
    open_run: Option<OpenRun>,
}

/// A byte-range substitution on the part.
type Edit = (Range<usize>, String);

/// Repair every paragraph of a part.
///
/// Returns `None` when nothing needed repair.
pub(crate) fn repair_part(xml: &str, options: &TemplateOptions) -> Result<Option<String>> {
    let paragraphs = tokenize(xml)?;

    let mut edits: Vec<Edit> = Vec::new();
    for runs in &paragraphs {
        plan_paragraph(xml, runs, options, &mut edits);
    }

    if edits.is_empty() {
        return Ok(None);
    }

    // Apply back to front so earlier offsets stay valid
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut repaired = xml.to_string();
    for (range, replacement) in edits {
        repaired.replace_range(range, &replacement);
    }
    Ok(Some(repaired))
}

/// Split a part into the run lists of its paragraphs, innermost paragraphs
/// (text boxes) included as separate lists.
pub(crate) fn tokenize(xml: &str) -> Result<Vec<Vec<RunSpan>>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut stack: Vec<ParagraphFrame> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut depth = 0usize;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| Error::malformed(current_element(&stack), e))?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                let parent_depth = depth;
                depth += 1;
                match e.local_name().as_ref() {
                    b"p" => {
                        // A paragraph inside a run (text box) pins that run
                        if let Some(run) = stack.last_mut().and_then(|f| f.open_run.as_mut()) {
                            run.mergeable = false;
                        }
                        stack.push(ParagraphFrame::default());
                    },
                    b"r" if stack.last().is_some_and(|f| f.open_run.is_none()) => {
                        if let Some(frame) = stack.last_mut() {
                            frame.open_run = Some(OpenRun {
                                start: before,
                                depth,
                                rpr_start: None,
                                rpr: None,
                                text: String::new(),
                                prefix: prefix_of(&e),
                                mergeable: true,
                                in_text: false,
                            });
                        }
                    },
                    local => {
                        if let Some(run) = open_child_run(&mut stack, parent_depth) {
                            match local {
                                b"rPr" => run.rpr_start = Some(before),
                                b"t" => run.in_text = true,
                                _ => run.mergeable = false,
                            }
                        }
                    },
                }
            },
            Event::Empty(e) => {
                if let Some(run) = open_child_run(&mut stack, depth) {
                    match e.local_name().as_ref() {
                        b"rPr" => run.rpr = Some(before..after),
                        b"t" | b"lastRenderedPageBreak" => {},
                        _ => run.mergeable = false,
                    }
                }
            },
            Event::Text(e) => {
                if let Some(run) = innermost_run(&mut stack)
                    && run.in_text
                {
                    run.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            },
            Event::GeneralRef(e) => {
                if let Some(run) = innermost_run(&mut stack)
                    && run.in_text
                {
                    let name = String::from_utf8_lossy(e.as_ref());
                    let ch = resolve_entity(&name).ok_or_else(|| {
                        Error::malformed("w:t", format!("unknown entity &{};", name))
                    })?;
                    run.text.push(ch);
                }
            },
            Event::End(e) => {
                let closing_depth = depth;
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"p" => {
                        let closes_frame = stack
                            .last()
                            .is_some_and(|f| f.open_run.is_none());
                        if closes_frame && let Some(frame) = stack.pop() {
                            paragraphs.push(frame.runs);
                        }
                    },
                    b"r" => {
                        if let Some(frame) = stack.last_mut()
                            && frame.open_run.as_ref().is_some_and(|r| r.depth == closing_depth)
                            && let Some(run) = frame.open_run.take()
                        {
                            frame.runs.push(RunSpan {
                                range: run.start..after,
                                rpr: run.rpr,
                                text: run.text,
                                prefix: run.prefix,
                                mergeable: run.mergeable,
                            });
                        }
                    },
                    local => {
                        let parent_depth = closing_depth.saturating_sub(1);
                        if let Some(run) = open_child_run(&mut stack, parent_depth) {
                            match local {
                                b"rPr" => run.rpr = run.rpr_start.take().map(|start| start..after),
                                b"t" => run.in_text = false,
                                _ => {},
                            }
                        }
                    },
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(paragraphs)
}

/// The open run of the innermost paragraph, if `parent_depth` is its depth.
fn open_child_run(stack: &mut [ParagraphFrame], parent_depth: usize) -> Option<&mut OpenRun> {
    stack
        .last_mut()
        .and_then(|frame| frame.open_run.as_mut())
        .filter(|run| run.depth == parent_depth)
}

fn innermost_run(stack: &mut [ParagraphFrame]) -> Option<&mut OpenRun> {
    stack.last_mut().and_then(|frame| frame.open_run.as_mut())
}

fn current_element(stack: &[ParagraphFrame]) -> &'static str {
    match stack.last() {
        Some(frame) if frame.open_run.is_some() => "w:r",
        Some(_) => "w:p",
        None => "?",
    }
}

fn prefix_of(e: &BytesStart<'_>) -> String {
    e.name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
        .unwrap_or_default()
}

/// Greedy left-to-right merge over the runs of one paragraph.
fn plan_paragraph(xml: &str, runs: &[RunSpan], options: &TemplateOptions, edits: &mut Vec<Edit>) {
    let window = options.max_run_span.max(1);
    let mut i = 0;

    while i < runs.len() {
        let run = &runs[i];
        let candidate = runs.len() >= 2
            && run.mergeable
            && (run.text.contains('{') || run.text.contains('}'));

        if candidate && let Some(last) = find_span(runs, i, window) {
            let text: String = runs[i..=last].iter().map(|r| r.text.as_str()).collect();
            let text = if options.normalize_whitespace {
                normalize_placeholders(&text).into_owned()
            } else {
                text
            };
            edits.push((run.range.clone(), synthetic_run(xml, run, &text)));
            for absorbed in &runs[i + 1..=last] {
                edits.push((absorbed.range.clone(), String::new()));
            }
            i = last + 1;
            continue;
        }

        // A lone run can still carry `{{ name }}`
        if options.normalize_whitespace && run.mergeable {
            let normalized = normalize_placeholders(&run.text);
            if normalized != run.text {
                edits.push((run.range.clone(), synthetic_run(xml, run, &normalized)));
            }
        }
        i += 1;
    }
}

/// Index of the last run of a window starting at `first` whose concatenation
/// completes a placeholder that begins inside the first run.
fn find_span(runs: &[RunSpan], first: usize, window: usize) -> Option<usize> {
    let first_len = runs[first].text.len();
    let mut concat = runs[first].text.clone();
    let end = runs.len().min(first + window);

    for (offset, run) in runs[first + 1..end].iter().enumerate() {
        if !run.mergeable {
            return None;
        }
        concat.push_str(&run.text);

        let crosses = PLACEHOLDER
            .find_iter(&concat)
            .any(|m| m.start() < first_len && m.end() > first_len);
        if crosses {
            return Some(first + 1 + offset);
        }

        // A closing brace pair reached without a match ends the attempt
        let tail = concat.as_bytes().get(first_len.saturating_sub(1)..).unwrap_or_default();
        if memmem::find(tail, b"}}").is_some() {
            return None;
        }
    }

    None
}

/// One run with the first run's properties and a single text element.
fn synthetic_run(xml: &str, first: &RunSpan, text: &str) -> String {
    let qualify = |local: &str| {
        if first.prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", first.prefix, local)
        }
    };
    let run = qualify("r");
    let t = qualify("t");
    let rpr = first
        .rpr
        .as_ref()
        .and_then(|range| xml.get(range.clone()))
        .unwrap_or_default();

    format!(
        r#"<{run}>{rpr}<{t} xml:space="preserve">{}</{t}></{run}>"#,
        escape_xml(text)
    )
}
