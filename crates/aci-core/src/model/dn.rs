// ── Distinguished names ──
//
// A DN is the `/`-joined chain of relative names from the MIT root to an
// object. Relation objects embed a target DN in brackets
// (`rsdecommissionNode-[topology/pod-1/node-101]`), so slashes inside
// brackets never split a segment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Distinguished name of a managed object, e.g. `uni/tn-prod/ctx-vrf1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dn(String);

impl Dn {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append one relative name.
    #[must_use]
    pub fn child(&self, rn: &str) -> Self {
        if self.0.is_empty() {
            Self(rn.to_owned())
        } else {
            Self(format!("{}/{rn}", self.0))
        }
    }

    /// Relative names from the root, honouring bracketed targets.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, c) in self.0.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '/' if depth == 0 => {
                    segments.push(&self.0[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        if start < self.0.len() {
            segments.push(&self.0[start..]);
        }
        segments
    }

    /// The last segment.
    pub fn rn(&self) -> &str {
        self.segments().last().copied().unwrap_or_default()
    }

    /// The DN with its last segment removed, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let segments = self.segments();
        match segments.len() {
            0 | 1 => None,
            n => Some(Self(segments[..n - 1].join("/"))),
        }
    }

    /// The value following `<prefix>-` in the first matching segment.
    ///
    /// `Dn::new("topology/pod-1/node-101").segment_value("pod")` is `Some("1")`.
    pub fn segment_value(&self, prefix: &str) -> Option<&str> {
        self.segments().into_iter().find_map(|segment| {
            segment
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
        })
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Dn {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Dn {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Dn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_segments() {
        let dn = Dn::new("uni/fabric/site-hq/building-b1");
        assert_eq!(dn.segments(), ["uni", "fabric", "site-hq", "building-b1"]);
        assert_eq!(dn.rn(), "building-b1");
        assert_eq!(dn.parent(), Some(Dn::new("uni/fabric/site-hq")));
    }

    #[test]
    fn keeps_bracketed_targets_whole() {
        let dn = Dn::new("uni/fabric/outofsvc/rsdecommissionNode-[topology/pod-1/node-101]");
        assert_eq!(dn.rn(), "rsdecommissionNode-[topology/pod-1/node-101]");
        assert_eq!(dn.parent(), Some(Dn::new("uni/fabric/outofsvc")));
    }

    #[test]
    fn root_has_no_parent() {
        assert_eq!(Dn::new("uni").parent(), None);
        assert_eq!(Dn::new("").segments().len(), 0);
    }

    #[test]
    fn child_and_segment_value() {
        let node = Dn::new("topology").child("pod-2").child("node-201");
        assert_eq!(node.as_str(), "topology/pod-2/node-201");
        assert_eq!(node.segment_value("pod"), Some("2"));
        assert_eq!(node.segment_value("node"), Some("201"));
        assert_eq!(node.segment_value("tn"), None);
    }
}
