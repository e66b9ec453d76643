//! Substrate-description parser.
//!
//! Two grammars share one line-by-line core. A *standalone* description is a
//! dedicated substrate file; an *embedded* description is the interior of a
//! `SUBSTRATE ... ENDSUBSTRATE` block inside a host geometry document, parsed
//! with the host's line counter. The statement grammar is identical except
//! that `MEDIUM` is legal only in standalone files (host documents declare the
//! incident half-space elsewhere) and `ENDSUBSTRATE` is mandatory only in
//! embedded blocks.
//!
//! ```text
//! MEDIUM <materialName>      # upper half-space material (standalone only)
//! <z> GROUNDPLANE            # perfectly conducting plane at depth z
//! <z> <materialName>         # interface at depth z, new layer below it
//! ENDSUBSTRATE               # block terminator
//! ```
//!
//! Blank lines and `#` comments are skipped; depths must strictly decrease
//! from line to line. Parsing is fail-fast: the first error aborts with a
//! line-located diagnostic.

use std::fmt;
use std::io::BufRead;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use substrata_materials::{ConstantMaterial, MaterialError, MaterialRegistry};

use crate::stack::{Layer, LayerStack};

const TERMINATOR: &str = "ENDSUBSTRATE";

/// Where a diagnostic originated. Renders as `<source>:<line>: ` when the
/// description came from a named file, and as nothing otherwise (embedded
/// blocks report through the host document's own diagnostics).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub source: Option<String>,
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}: ", source, self.line),
            None => Ok(()),
        }
    }
}

/// A substrate-description parse failure.
#[derive(Debug, Error)]
#[error("{location}{kind}")]
pub struct ParseError {
    pub location: Location,
    pub kind: ParseErrorKind,
}

/// What went wrong on the offending line.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("failed to read substrate description: {0}")]
    Io(#[from] std::io::Error),

    #[error("syntax error")]
    Syntax,

    #[error("bad z-value {0}")]
    BadDepth(String),

    #[error("MEDIUM keyword forbidden in SUBSTRATE...ENDSUBSTRATE sections")]
    MediumForbidden,

    #[error("z coordinate lies above previous layer")]
    DepthAbovePrevious,

    #[error("ground plane must lie below all dielectric layers")]
    GroundPlaneAboveLayers,

    #[error("expected ENDSUBSTRATE before end of file")]
    MissingTerminator,

    #[error(transparent)]
    Material(#[from] MaterialError),
}

/// Per-mode parameters of the shared line machine.
struct ParseContext<'a> {
    /// Diagnostic source name; present only for standalone files.
    source: Option<&'a str>,
    /// `MEDIUM` statements are legal.
    medium_allowed: bool,
    /// `ENDSUBSTRATE` must appear before end of input.
    terminator_required: bool,
}

/// Parse a standalone substrate-description file.
///
/// `source` names the input in diagnostics. A trailing `ENDSUBSTRATE` is
/// tolerated with a warning; it belongs to the embedded grammar.
pub fn parse_standalone(
    reader: impl BufRead,
    source: &str,
    registry: &MaterialRegistry,
) -> Result<LayerStack, ParseError> {
    let ctx = ParseContext {
        source: Some(source),
        medium_allowed: true,
        terminator_required: false,
    };
    let (stack, _) = parse_lines(reader, &ctx, 0, registry)?;
    Ok(stack)
}

/// Parse the interior of a `SUBSTRATE ... ENDSUBSTRATE` block.
///
/// The reader must be positioned just past the opening `SUBSTRATE` line;
/// `line` is the host document's line counter, advanced past the terminator
/// on success.
pub fn parse_embedded(
    reader: impl BufRead,
    line: &mut usize,
    registry: &MaterialRegistry,
) -> Result<LayerStack, ParseError> {
    let ctx = ParseContext {
        source: None,
        medium_allowed: false,
        terminator_required: true,
    };
    let (stack, end_line) = parse_lines(reader, &ctx, *line, registry)?;
    *line = end_line;
    Ok(stack)
}

/// The shared line machine behind both front-ends.
fn parse_lines(
    reader: impl BufRead,
    ctx: &ParseContext<'_>,
    start_line: usize,
    registry: &MaterialRegistry,
) -> Result<(LayerStack, usize), ParseError> {
    let mut stack = LayerStack::new(Layer::new("VACUUM", Arc::new(ConstantMaterial::vacuum())));
    let mut line_num = start_line;
    let mut got_terminator = false;

    let locate = |line_num: usize| Location {
        source: ctx.source.map(str::to_owned),
        line: line_num,
    };
    let fail = |line_num: usize, kind: ParseErrorKind| ParseError {
        location: locate(line_num),
        kind,
    };

    for line in reader.lines() {
        line_num += 1;
        let line = line.map_err(|e| fail(line_num, e.into()))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0].starts_with('#') {
            continue;
        }

        if tokens[0].eq_ignore_ascii_case(TERMINATOR) {
            got_terminator = true;
            break;
        }

        if tokens.len() != 2 {
            return Err(fail(line_num, ParseErrorKind::Syntax));
        }

        if tokens[0].eq_ignore_ascii_case("MEDIUM") {
            if !ctx.medium_allowed {
                return Err(fail(line_num, ParseErrorKind::MediumForbidden));
            }
            let material = registry
                .lookup(tokens[1])
                .map_err(|e| fail(line_num, e.into()))?;
            debug!(medium = tokens[1], "setting upper half-space medium");
            stack.set_medium(Layer::new(tokens[1], material));
            continue;
        }

        let z: f64 = tokens[0]
            .parse()
            .map_err(|_| fail(line_num, ParseErrorKind::BadDepth(tokens[0].to_string())))?;

        if tokens[1].eq_ignore_ascii_case("GROUNDPLANE") {
            debug!(z, "ground plane");
            stack.set_ground_plane(z);
        } else {
            let material = registry
                .lookup(tokens[1])
                .map_err(|e| fail(line_num, e.into()))?;
            stack
                .push_layer(z, Layer::new(tokens[1], material))
                .map_err(|_| fail(line_num, ParseErrorKind::DepthAbovePrevious))?;
            debug!(layer = stack.num_interfaces(), material = tokens[1], z, "added layer");
        }
    }

    if ctx.terminator_required && !got_terminator {
        return Err(fail(line_num, ParseErrorKind::MissingTerminator));
    }
    if !ctx.terminator_required && got_terminator {
        warn!(
            "{}ENDSUBSTRATE is not needed in substrate files",
            locate(line_num)
        );
    }

    if !stack.ground_plane_below_layers() {
        return Err(fail(line_num, ParseErrorKind::GroundPlaneAboveLayers));
    }

    Ok((stack, line_num))
}
