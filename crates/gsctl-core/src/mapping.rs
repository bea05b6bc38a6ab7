// ── Code/label mapping tables ──
//
// Static bidirectional dictionaries between the codes a switch stores and
// the labels an operator types. One table per configurable field, with a
// family-specific variant where the two firmware generations disagree.

use gsctl_api::{PortSetting, SwitchFamily};

use crate::error::CoreError;

/// Returned by [`CodeTable::lookup`] when a value is neither a code nor a label.
pub const UNKNOWN: &str = "unknown";

/// A closed code ↔ label dictionary for one field.
#[derive(Debug)]
pub struct CodeTable {
    field: &'static str,
    /// `(code, label)` pairs.
    entries: &'static [(&'static str, &'static str)],
    /// `(alias, canonical label)` pairs accepted on input only.
    aliases: &'static [(&'static str, &'static str)],
}

impl CodeTable {
    const fn new(field: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            field,
            entries,
            aliases: &[],
        }
    }

    const fn with_aliases(
        field: &'static str,
        entries: &'static [(&'static str, &'static str)],
        aliases: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            field,
            entries,
            aliases,
        }
    }

    /// Name of the field this table translates, used in error messages.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// All `(code, label)` pairs in device order.
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Code for a label. Exact matches win over case-insensitive ones.
    pub fn encode(&self, label: &str) -> Option<&'static str> {
        let label = label.trim();
        let label = self
            .aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(label))
            .map_or(label, |&(_, canonical)| canonical);

        self.entries
            .iter()
            .find(|(_, l)| *l == label)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(_, l)| l.eq_ignore_ascii_case(label))
            })
            .map(|&(code, _)| code)
    }

    /// Label for a code.
    pub fn decode(&self, code: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code.trim())
            .map(|&(_, label)| label)
    }

    /// Translate in whichever direction matches, or [`UNKNOWN`].
    pub fn lookup(&self, value: &str) -> &'static str {
        self.decode(value)
            .or_else(|| self.encode(value))
            .unwrap_or(UNKNOWN)
    }

    /// Label for display, falling back to the raw value.
    pub fn display(&self, code: &str) -> String {
        self.decode(code).map_or_else(|| code.to_owned(), str::to_owned)
    }

    /// Accepted labels, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.entries.iter().map(|(_, l)| (*l).to_owned()).collect();
        labels.sort();
        labels
    }

    /// Encode a caller-supplied label or fail with the accepted list.
    pub fn require(&self, label: &str) -> Result<&'static str, CoreError> {
        self.encode(label)
            .ok_or_else(|| CoreError::InvalidSettingValue {
                setting: self.field,
                value: label.to_owned(),
                accepted: self.labels(),
            })
    }

    /// Code for a value that may already be a code or a displayed label.
    /// Anything unrecognised is kept verbatim.
    pub fn normalize(&self, value: &str) -> String {
        if self.decode(value).is_some() {
            return value.trim().to_owned();
        }
        self.encode(value)
            .map_or_else(|| value.to_owned(), str::to_owned)
    }
}

// ── Port tables ──────────────────────────────────────────────────────

pub static SPEED: CodeTable = CodeTable::new(
    "speed",
    &[
        ("1", "Auto"),
        ("2", "Disable"),
        ("3", "10M half"),
        ("4", "10M full"),
        ("5", "100M half"),
        ("6", "100M full"),
    ],
);

pub static INGRESS_RATE: CodeTable = CodeTable::new("ingress rate", RATE_LIMITS);
pub static EGRESS_RATE: CodeTable = CodeTable::new("egress rate", RATE_LIMITS);

const RATE_LIMITS: &[(&str, &str)] = &[
    ("1", "No Limit"),
    ("2", "512 Kbit/s"),
    ("3", "1 Mbit/s"),
    ("4", "2 Mbit/s"),
    ("5", "4 Mbit/s"),
    ("6", "8 Mbit/s"),
    ("7", "16 Mbit/s"),
    ("8", "32 Mbit/s"),
    ("9", "64 Mbit/s"),
    ("10", "128 Mbit/s"),
    ("11", "256 Mbit/s"),
    ("12", "512 Mbit/s"),
];

static FLOW_CONTROL_GS30X: CodeTable =
    CodeTable::new("flow control", &[("1", "On"), ("2", "Off")]);
static FLOW_CONTROL_GS316: CodeTable =
    CodeTable::new("flow control", &[("4", "On"), ("1", "Off")]);

// ── PoE tables ───────────────────────────────────────────────────────

pub static POWER_MODE: CodeTable = CodeTable::new(
    "power mode",
    &[
        ("0", "802.3af"),
        ("1", "legacy"),
        ("2", "pre-802.3at"),
        ("3", "802.3at"),
    ],
);

static PRIORITY_GS30X: CodeTable = CodeTable::new(
    "priority",
    &[("0", "low"), ("2", "high"), ("3", "critical")],
);
static PRIORITY_GS316: CodeTable = CodeTable::new(
    "priority",
    &[("1", "low"), ("2", "high"), ("3", "critical")],
);

pub static LIMIT_TYPE: CodeTable = CodeTable::new(
    "limit type",
    &[("0", "none"), ("1", "class"), ("2", "user")],
);

const DETECTION_TYPES: &[(&str, &str)] = &[
    ("1", "Legacy"),
    ("2", "IEEE 802"),
    ("3", "4pt 802.3af + Legacy"),
];

static DETECTION_TYPE_GS30X: CodeTable = CodeTable::new("detection type", DETECTION_TYPES);
static DETECTION_TYPE_GS316: CodeTable = CodeTable::with_aliases(
    "detection type",
    DETECTION_TYPES,
    &[("IEEE802", "IEEE 802")],
);

pub static LONGER_DETECTION: CodeTable = CodeTable::new(
    "longer detection time",
    &[("0", "Get Value Fault"), ("2", "disable"), ("3", "enable")],
);

/// Flow control codes differ between families.
pub fn flow_control(family: SwitchFamily) -> &'static CodeTable {
    match family {
        SwitchFamily::Gs30x => &FLOW_CONTROL_GS30X,
        SwitchFamily::Gs316 => &FLOW_CONTROL_GS316,
    }
}

/// `Gs316` priorities are 1-based.
pub fn priority(family: SwitchFamily) -> &'static CodeTable {
    match family {
        SwitchFamily::Gs30x => &PRIORITY_GS30X,
        SwitchFamily::Gs316 => &PRIORITY_GS316,
    }
}

/// `Gs316` additionally accepts `IEEE802`.
pub fn detection_type(family: SwitchFamily) -> &'static CodeTable {
    match family {
        SwitchFamily::Gs30x => &DETECTION_TYPE_GS30X,
        SwitchFamily::Gs316 => &DETECTION_TYPE_GS316,
    }
}

/// Every table, for exhaustive checks.
pub fn all_tables() -> [&'static CodeTable; 12] {
    [
        &SPEED,
        &INGRESS_RATE,
        &EGRESS_RATE,
        &FLOW_CONTROL_GS30X,
        &FLOW_CONTROL_GS316,
        &POWER_MODE,
        &PRIORITY_GS30X,
        &PRIORITY_GS316,
        &LIMIT_TYPE,
        &DETECTION_TYPE_GS30X,
        &DETECTION_TYPE_GS316,
        &LONGER_DETECTION,
    ]
}

/// Translate the labels a `Gs316` dashboard shows back to codes.
///
/// `Gs30x` records already hold codes and pass through untouched.
pub fn normalize_port(family: SwitchFamily, port: PortSetting) -> PortSetting {
    match family {
        SwitchFamily::Gs30x => port,
        SwitchFamily::Gs316 => PortSetting {
            speed: SPEED.normalize(&port.speed),
            ingress_rate: INGRESS_RATE.normalize(&port.ingress_rate),
            egress_rate: EGRESS_RATE.normalize(&port.egress_rate),
            flow_control: FLOW_CONTROL_GS316.normalize(&port.flow_control),
            ..port
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_table_round_trips() {
        for table in all_tables() {
            for &(code, label) in table.entries() {
                assert_eq!(table.encode(label), Some(code), "{}: {label}", table.field());
                assert_eq!(table.decode(code), Some(label), "{}: {code}", table.field());
                assert_eq!(table.lookup(code), label);
                assert_eq!(table.lookup(label), code);
            }
        }
    }

    #[test]
    fn matching_falls_back_to_case_insensitive() {
        assert_eq!(SPEED.encode("auto"), Some("1"));
        assert_eq!(SPEED.encode("100m FULL"), Some("6"));
        assert_eq!(LONGER_DETECTION.encode("Enable"), Some("3"));
    }

    #[test]
    fn gs316_accepts_ieee802_alias() {
        assert_eq!(detection_type(SwitchFamily::Gs316).encode("IEEE802"), Some("2"));
        assert_eq!(detection_type(SwitchFamily::Gs30x).encode("IEEE802"), None);
    }

    #[test]
    fn families_disagree_on_flow_control_and_priority() {
        assert_eq!(flow_control(SwitchFamily::Gs30x).encode("On"), Some("1"));
        assert_eq!(flow_control(SwitchFamily::Gs316).encode("On"), Some("4"));
        assert_eq!(priority(SwitchFamily::Gs30x).encode("low"), Some("0"));
        assert_eq!(priority(SwitchFamily::Gs316).encode("low"), Some("1"));
    }

    #[test]
    fn lookup_yields_sentinel() {
        assert_eq!(SPEED.lookup("warp"), UNKNOWN);
        assert_eq!(SPEED.lookup("9"), UNKNOWN);
    }

    #[test]
    fn require_lists_sorted_labels() {
        let err = LIMIT_TYPE.require("sometimes").unwrap_err();
        match err {
            CoreError::InvalidSettingValue {
                setting, accepted, ..
            } => {
                assert_eq!(setting, "limit type");
                assert_eq!(accepted, vec!["class", "none", "user"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn normalizes_gs316_dashboard_labels() {
        let port = PortSetting {
            index: 3,
            name: String::new(),
            speed: "100M full".into(),
            ingress_rate: "8 Mbit/s".into(),
            egress_rate: "No Limit".into(),
            flow_control: "On".into(),
        };
        let port = normalize_port(SwitchFamily::Gs316, port);
        assert_eq!(port.speed, "6");
        assert_eq!(port.ingress_rate, "6");
        assert_eq!(port.egress_rate, "1");
        assert_eq!(port.flow_control, "4");
    }

    #[test]
    fn unknown_labels_are_kept_verbatim() {
        assert_eq!(SPEED.normalize("2.5G full"), "2.5G full");
        assert_eq!(SPEED.normalize("3"), "3");
    }
}
