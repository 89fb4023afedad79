//! UCI output parsing
//!
//! Turns `info` and `bestmove` lines into typed updates and folds them into
//! an [`AnalysisResult`]. Only the most recent value of each field is kept;
//! earlier ones are overwritten, never merged.

use serde::{Deserialize, Serialize};

/// Evaluation unit reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Hundredths of a pawn
    Cp,
    /// Forced mate in N moves, negative when the side to move is mated
    Mate,
}

/// Engine evaluation with a display string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(rename = "type")]
    pub kind: ScoreKind,
    pub value: i32,
    pub display: String,
}

impl Evaluation {
    /// `35` displays as `+0.35`, `-120` as `-1.20`
    pub fn centipawns(value: i32) -> Self {
        Self {
            kind: ScoreKind::Cp,
            value,
            display: format!("{:+.2}", f64::from(value) / 100.0),
        }
    }

    /// `3` displays as `M3`, `-2` as `M-2`
    pub fn mate(value: i32) -> Self {
        Self {
            kind: ScoreKind::Mate,
            value,
            display: format!("M{value}"),
        }
    }
}

/// Fields found on a single `info` line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoUpdate {
    pub evaluation: Option<Evaluation>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub pv: Option<String>,
}

impl InfoUpdate {
    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.evaluation.is_none() && self.depth.is_none() && self.nodes.is_none() && self.pv.is_none()
    }
}

/// Scan an `info` line; `None` for any other line
///
/// Each field is looked for independently. `seldepth` is not `depth`, and
/// everything after `string` is free text and never scanned.
pub fn parse_info(line: &str) -> Option<InfoUpdate> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("info") {
        return None;
    }

    let tokens: Vec<&str> = tokens.take_while(|token| *token != "string").collect();
    let mut update = InfoUpdate::default();

    for (i, token) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1).copied();
        match *token {
            "depth" => {
                if let Some(depth) = next.and_then(|v| v.parse().ok()) {
                    update.depth = Some(depth);
                }
            }
            "nodes" => {
                if let Some(nodes) = next.and_then(|v| v.parse().ok()) {
                    update.nodes = Some(nodes);
                }
            }
            "score" => match (next, tokens.get(i + 2).and_then(|v| v.parse().ok())) {
                (Some("cp"), Some(value)) => update.evaluation = Some(Evaluation::centipawns(value)),
                (Some("mate"), Some(value)) => update.evaluation = Some(Evaluation::mate(value)),
                _ => {}
            },
            "pv" => break,
            _ => {}
        }
    }

    update.pv = pv_remainder(line);
    Some(update)
}

/// Raw text after the ` pv ` marker, untouched
fn pv_remainder(line: &str) -> Option<String> {
    let scanned = match line.find(" string ") {
        Some(end) => &line[..end],
        None => line,
    };
    let start = scanned.find(" pv ")? + " pv ".len();
    let pv = scanned[start..].trim();
    (!pv.is_empty()).then(|| pv.to_string())
}

/// The terminal `bestmove` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove {
    pub bestmove: String,
    pub ponder: Option<String>,
}

/// Parse `bestmove <move> [ponder <move>]`; `None` for any other line
pub fn parse_bestmove(line: &str) -> Option<BestMove> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") {
        return None;
    }

    let bestmove = tokens.next().unwrap_or("(none)").to_string();
    let mut ponder = None;
    while let Some(token) = tokens.next() {
        if token == "ponder" {
            ponder = tokens.next().map(str::to_string);
            break;
        }
    }

    Some(BestMove { bestmove, ponder })
}

/// Latest values seen during one search
///
/// Scoped to a single session; a new one is created per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchProgress {
    pub evaluation: Option<Evaluation>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub pv: Option<String>,
}

impl SearchProgress {
    /// Overwrite every field the update carries
    pub fn apply(&mut self, update: InfoUpdate) {
        if let Some(evaluation) = update.evaluation {
            self.evaluation = Some(evaluation);
        }
        if let Some(depth) = update.depth {
            self.depth = Some(depth);
        }
        if let Some(nodes) = update.nodes {
            self.nodes = Some(nodes);
        }
        if let Some(pv) = update.pv {
            self.pv = Some(pv);
        }
    }

    pub fn finish(self, best: BestMove) -> AnalysisResult {
        AnalysisResult {
            bestmove: best.bestmove,
            ponder: best.ponder,
            evaluation: self.evaluation,
            depth: self.depth,
            nodes: self.nodes,
            pv: self.pv,
        }
    }
}

/// Structured outcome of a completed search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub bestmove: String,
    pub ponder: Option<String>,
    pub evaluation: Option<Evaluation>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub pv: Option<String>,
}
