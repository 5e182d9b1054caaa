//! Redraw protocol events
//!
//! Decodes the transport's JSON form of a redraw batch into a closed
//! enumeration of instruction kinds. The dispatch in `render` is an
//! exhaustive match over [`RedrawEvent`], so every known instruction is
//! guaranteed a handler at compile time and unknown instruction names fall
//! into an explicit ignore arm here instead of a missing map entry.
//!
//! A batch is a JSON array of `[name, tuple, tuple, ...]` entries. Each
//! tuple becomes one event, in order - except `put`, whose tuples for one
//! entry aggregate into a single [`RedrawEvent::Put`] so the glyph-write
//! handler can advance the cursor across all of them in one call.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// One decoded screen-update instruction
#[derive(Debug, Clone, PartialEq)]
pub enum RedrawEvent {
    /// Fill the entire grid with the current background color
    Clear,
    /// Fill from the cursor column to the end of the row with background
    EolClear,
    /// Update the default foreground color (negative = no-op)
    UpdateFg(i64),
    /// Update the default background color (negative = no-op)
    UpdateBg(i64),
    /// Update the special color (negative = no-op)
    UpdateSp(i64),
    /// Move the cursor to an absolute cell position
    CursorGoto { row: usize, col: usize },
    /// Declare the scroll region for the next scroll instruction
    SetScrollRegion {
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
    },
    /// Scroll the active region; positive moves content up
    Scroll(i64),
    /// Write a run of glyphs at the cursor, advancing it with wrap
    Put(Vec<String>),
    /// Replace the current highlight attributes
    HighlightSet(HighlightAttrs),
    /// Register cursor descriptors for a set of editing modes
    ModeInfoSet(Vec<ModeInfoPayload>),
    /// Switch the displayed cursor to a registered mode
    ModeChange(String),
}

/// Wire payload of a highlight-set instruction
///
/// Colors are packed integers; a missing field falls back to the screen
/// default when the attributes are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct HighlightAttrs {
    pub foreground: Option<i64>,
    pub background: Option<i64>,
    pub special: Option<i64>,
    pub reverse: bool,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub undercurl: bool,
}

/// Wire payload of one mode descriptor inside mode-info-set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModeInfoPayload {
    pub name: String,
    #[serde(default)]
    pub cursor_shape: Option<String>,
    #[serde(default)]
    pub cell_percentage: Option<u8>,
    #[serde(default)]
    pub hl_id: Option<u64>,
}

/// Errors for input that is not a redraw batch at all
///
/// Malformed tuples inside a well-formed batch are skipped (with a log),
/// not errors: the protocol is forward-compatible by construction.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("redraw batch is not an array")]
    BatchNotArray,
    #[error("batch entry {0} is not an array")]
    EntryNotArray(usize),
    #[error("batch entry {0} has no instruction name")]
    MissingName(usize),
}

/// Decode one ordered batch into events, preserving instruction order
pub fn decode_batch(batch: &Value) -> Result<Vec<RedrawEvent>, ProtocolError> {
    let entries = batch.as_array().ok_or(ProtocolError::BatchNotArray)?;
    let mut events = Vec::with_capacity(entries.len());
    for (ix, entry) in entries.iter().enumerate() {
        let entry = entry.as_array().ok_or(ProtocolError::EntryNotArray(ix))?;
        let name = entry
            .first()
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingName(ix))?;
        decode_instruction(name, &entry[1..], &mut events);
    }
    Ok(events)
}

fn decode_instruction(name: &str, tuples: &[Value], out: &mut Vec<RedrawEvent>) {
    match name {
        // The whole tuple list becomes one aggregated glyph-write call
        "put" => {
            let cells = tuples
                .iter()
                .filter_map(|tuple| {
                    let cell = tuple.as_array()?.first()?.as_str()?;
                    Some(cell.to_string())
                })
                .collect();
            out.push(RedrawEvent::Put(cells));
        }

        // Zero-argument instructions; emitted once even when the transport
        // omits the empty argument tuple
        "clear" => {
            for _ in 0..tuples.len().max(1) {
                out.push(RedrawEvent::Clear);
            }
        }
        "eol_clear" => {
            for _ in 0..tuples.len().max(1) {
                out.push(RedrawEvent::EolClear);
            }
        }

        "update_fg" => decode_each(name, tuples, out, |args| {
            Some(RedrawEvent::UpdateFg(args.first()?.as_i64()?))
        }),
        "update_bg" => decode_each(name, tuples, out, |args| {
            Some(RedrawEvent::UpdateBg(args.first()?.as_i64()?))
        }),
        "update_sp" => decode_each(name, tuples, out, |args| {
            Some(RedrawEvent::UpdateSp(args.first()?.as_i64()?))
        }),

        "cursor_goto" => decode_each(name, tuples, out, |args| {
            Some(RedrawEvent::CursorGoto {
                row: args.first()?.as_u64()? as usize,
                col: args.get(1)?.as_u64()? as usize,
            })
        }),

        "set_scroll_region" => decode_each(name, tuples, out, |args| {
            Some(RedrawEvent::SetScrollRegion {
                top: args.first()?.as_u64()? as usize,
                bottom: args.get(1)?.as_u64()? as usize,
                left: args.get(2)?.as_u64()? as usize,
                right: args.get(3)?.as_u64()? as usize,
            })
        }),

        "scroll" => decode_each(name, tuples, out, |args| {
            Some(RedrawEvent::Scroll(args.first()?.as_i64()?))
        }),

        // An empty attrs payload is valid and means "back to defaults"
        "highlight_set" => decode_each(name, tuples, out, |args| {
            let attrs = match args.first() {
                Some(value) => serde_json::from_value(value.clone()).ok()?,
                None => HighlightAttrs::default(),
            };
            Some(RedrawEvent::HighlightSet(attrs))
        }),

        // Payload is [cursor_style_enabled, [modes...]]; the leading flag
        // is part of the protocol but carries nothing we render
        "mode_info_set" => decode_each(name, tuples, out, |args| {
            let modes = serde_json::from_value(args.get(1)?.clone()).ok()?;
            Some(RedrawEvent::ModeInfoSet(modes))
        }),

        "mode_change" => decode_each(name, tuples, out, |args| {
            Some(RedrawEvent::ModeChange(args.first()?.as_str()?.to_string()))
        }),

        // Forward compatibility: instructions we do not understand yet are
        // silently ignored
        _ => debug!(instruction = name, "ignoring unknown instruction"),
    }
}

/// Fan an instruction's argument tuples out into one event each
fn decode_each(
    name: &str,
    tuples: &[Value],
    out: &mut Vec<RedrawEvent>,
    decode: impl Fn(&[Value]) -> Option<RedrawEvent>,
) {
    for tuple in tuples {
        let Some(args) = tuple.as_array() else {
            warn!(instruction = name, "argument tuple is not an array");
            continue;
        };
        match decode(args) {
            Some(event) => out.push(event),
            None => warn!(instruction = name, "skipping malformed argument tuple"),
        }
    }
}
