use crate::fragment::char_len;
use crate::namespace::Namespace;

/// A completion waiting to be accepted with enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub candidate: String,
    /// Characters before the cursor the candidate replaces
    pub replace: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every segment of the token named an existing property.
    Exact { path: Vec<String> },
    /// `partial` did not resolve under `path`; `candidates` start with it,
    /// shortest first.
    Partial {
        path: Vec<String>,
        partial: String,
        candidates: Vec<String>,
    },
}

impl Resolution {
    /// The shortest candidate, staged for acceptance.
    pub fn suggestion(&self) -> Option<Suggestion> {
        match self {
            Resolution::Exact { .. } => None,
            Resolution::Partial {
                partial,
                candidates,
                ..
            } => candidates.first().map(|c| Suggestion {
                candidate: c.clone(),
                replace: char_len(partial),
            }),
        }
    }

    /// Lines listing the outcome for the echo area.
    pub fn describe(&self) -> Vec<String> {
        match self {
            Resolution::Exact { .. } => vec!["<exact match>".into()],
            Resolution::Partial {
                path, candidates, ..
            } if candidates.is_empty() => {
                let prefix = path.join(".");
                vec![format!("<no completions under '{prefix}'>")]
            }
            Resolution::Partial {
                path, candidates, ..
            } => candidates
                .iter()
                .map(|c| {
                    if path.is_empty() {
                        c.clone()
                    } else {
                        format!("{}.{c}", path.join("."))
                    }
                })
                .collect(),
        }
    }
}

/// The word autocomplete works on: the last space-separated token.
pub fn current_token(before_cursor: &str) -> &str {
    before_cursor.rsplit(' ').next().unwrap_or("")
}

/// Walk the dotted token before the cursor through `namespace`.
pub fn resolve<N: Namespace>(namespace: &N, before_cursor: &str) -> Resolution {
    let token = current_token(before_cursor);
    let mut node = namespace.root();
    let mut path = Vec::new();

    for segment in token.split('.') {
        match namespace.get(node, segment) {
            Some(next) if !segment.is_empty() => {
                path.push(segment.to_string());
                node = next;
            }
            _ => {
                let mut candidates: Vec<String> = namespace
                    .keys(node)
                    .into_iter()
                    .filter(|k| k.starts_with(segment))
                    .collect();
                candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
                return Resolution::Partial {
                    path,
                    partial: segment.to_string(),
                    candidates,
                };
            }
        }
    }

    Resolution::Exact { path }
}
