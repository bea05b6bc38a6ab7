// ── Settings merge & validation ──
//
// Folds a sparse change request over the current record of one port and
// yields the fully-specified record to submit. Unspecified fields carry the
// current value forward, so merging an empty request is the identity.

use gsctl_api::{PoePortSetting, PortSetting, SwitchFamily};
use tracing::debug;

use crate::change::{PoeSettingsChange, PortSettingsChange};
use crate::error::CoreError;
use crate::mapping::{self, CodeTable};

/// Longest port name the switches store.
pub const MAX_NAME_LEN: usize = 16;

/// Lowest accepted power limit, in tenths of a watt.
pub const MIN_POWER_LIMIT: i64 = 30;

/// Limit type forced on `Gs316` when a power limit is set explicitly.
const USER_LIMIT_TYPE: &str = "2";

/// Merge a port settings request into the current record.
pub fn merge_port(
    family: SwitchFamily,
    current: &PortSetting,
    change: &PortSettingsChange,
) -> Result<PortSetting, CoreError> {
    Ok(PortSetting {
        index: current.index,
        name: merge_name(&current.name, change.name.as_deref())?,
        speed: merge_code(&mapping::SPEED, &current.speed, change.speed.as_deref())?,
        ingress_rate: merge_code(
            &mapping::INGRESS_RATE,
            &current.ingress_rate,
            change.ingress_rate.as_deref(),
        )?,
        egress_rate: merge_code(
            &mapping::EGRESS_RATE,
            &current.egress_rate,
            change.egress_rate.as_deref(),
        )?,
        flow_control: merge_code(
            mapping::flow_control(family),
            &current.flow_control,
            change.flow_control.as_deref(),
        )?,
    })
}

/// Merge a PoE settings request into the current record.
///
/// `max_power_limit` is the device bound in decimal watts.
pub fn merge_poe(
    family: SwitchFamily,
    current: &PoePortSetting,
    change: &PoeSettingsChange,
    max_power_limit: &str,
) -> Result<PoePortSetting, CoreError> {
    let (limit_watts, limit_accepted) = merge_power_limit(
        family,
        &current.limit_watts,
        change.power_limit.as_deref(),
        max_power_limit,
    )?;

    let mut limit_type = merge_code(
        &mapping::LIMIT_TYPE,
        &current.limit_type,
        change.limit_type.as_deref(),
    )?;
    if limit_accepted && family == SwitchFamily::Gs316 {
        limit_type = USER_LIMIT_TYPE.to_owned();
    }

    Ok(PoePortSetting {
        index: current.index,
        name: current.name.clone(),
        admin_enabled: merge_admin(current.admin_enabled, change.admin.as_deref()),
        power_mode: merge_code(
            &mapping::POWER_MODE,
            &current.power_mode,
            change.power_mode.as_deref(),
        )?,
        priority: merge_code(
            mapping::priority(family),
            &current.priority,
            change.priority.as_deref(),
        )?,
        limit_type,
        limit_watts,
        detection_type: merge_code(
            mapping::detection_type(family),
            &current.detection_type,
            change.detection_type.as_deref(),
        )?,
        longer_detection: merge_code(
            &mapping::LONGER_DETECTION,
            &current.longer_detection,
            change.longer_detection.as_deref(),
        )?,
    })
}

fn merge_code(
    table: &CodeTable,
    current: &str,
    requested: Option<&str>,
) -> Result<String, CoreError> {
    match requested {
        None => Ok(current.to_owned()),
        Some(label) => table.require(label).map(str::to_owned),
    }
}

fn merge_name(current: &str, requested: Option<&str>) -> Result<String, CoreError> {
    match requested {
        None => Ok(current.to_owned()),
        Some(name) if name.chars().count() > MAX_NAME_LEN => {
            Err(CoreError::InvalidSettingValue {
                setting: "name",
                value: name.to_owned(),
                accepted: vec![format!("at most {MAX_NAME_LEN} characters")],
            })
        }
        Some(name) => Ok(name.to_owned()),
    }
}

fn merge_admin(current: bool, requested: Option<&str>) -> bool {
    match requested.map(str::to_ascii_lowercase).as_deref() {
        Some("enable" | "enabled") => true,
        Some("disable" | "disabled") => false,
        _ => current,
    }
}

/// Returns the merged limit and whether the requested value was taken.
fn merge_power_limit(
    family: SwitchFamily,
    current: &str,
    requested: Option<&str>,
    max: &str,
) -> Result<(String, bool), CoreError> {
    let Some(raw) = requested else {
        return Ok((current.to_owned(), false));
    };

    let max_tenths = parse_tenths(max)
        .or_else(|| parse_tenths(family.default_max_power_limit()))
        .unwrap_or(i64::MAX);
    let tenths = parse_tenths(raw).ok_or_else(|| CoreError::InvalidSettingValue {
        setting: "power limit",
        value: raw.to_owned(),
        accepted: vec![format!("{} to {} watts", format_tenths(MIN_POWER_LIMIT), max)],
    })?;

    if !(MIN_POWER_LIMIT..=max_tenths).contains(&tenths) {
        debug!(requested = raw, kept = current, "power limit out of range, keeping current");
        return Ok((current.to_owned(), false));
    }

    let step = i64::from(family.power_limit_step());
    Ok((format_tenths(tenths - tenths % step), true))
}

/// Parse a decimal watt value into tenths, truncating further digits.
fn parse_tenths(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    // All digits: a parse failure can only be overflow.
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().unwrap_or(i64::MAX / 10)
    };
    let tenth = frac.bytes().next().map_or(0, |b| i64::from(b - b'0'));
    let tenths = whole.saturating_mul(10).saturating_add(tenth);
    Some(if negative { -tenths } else { tenths })
}

fn format_tenths(tenths: i64) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn port() -> PortSetting {
        PortSetting {
            index: 1,
            name: "Camera".into(),
            speed: "1".into(),
            ingress_rate: "1".into(),
            egress_rate: "1".into(),
            flow_control: "2".into(),
        }
    }

    fn poe() -> PoePortSetting {
        PoePortSetting {
            index: 1,
            name: "Camera".into(),
            admin_enabled: true,
            power_mode: "3".into(),
            priority: "0".into(),
            limit_type: "1".into(),
            limit_watts: "15.0".into(),
            detection_type: "2".into(),
            longer_detection: "2".into(),
        }
    }

    fn limit(family: SwitchFamily, requested: &str) -> PoePortSetting {
        let change = PoeSettingsChange {
            power_limit: Some(requested.into()),
            ..PoeSettingsChange::default()
        };
        merge_poe(family, &poe(), &change, "30.0").unwrap()
    }

    #[test]
    fn empty_request_is_identity() {
        let merged = merge_port(SwitchFamily::Gs30x, &port(), &PortSettingsChange::default());
        assert_eq!(merged.unwrap(), port());

        let merged = merge_poe(SwitchFamily::Gs316, &poe(), &PoeSettingsChange::default(), "30.0");
        assert_eq!(merged.unwrap(), poe());
    }

    #[test]
    fn merging_twice_changes_nothing_more() {
        let change = PortSettingsChange {
            speed: Some("100M full".into()),
            flow_control: Some("on".into()),
            ..PortSettingsChange::default()
        };
        let once = merge_port(SwitchFamily::Gs30x, &port(), &change).unwrap();
        let twice = merge_port(SwitchFamily::Gs30x, &once, &change).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.speed, "6");
        assert_eq!(once.flow_control, "1");
    }

    #[test]
    fn name_boundaries() {
        let named = |name: &str| PortSettingsChange {
            name: Some(name.into()),
            ..PortSettingsChange::default()
        };

        let merged = merge_port(SwitchFamily::Gs30x, &port(), &named("ABCDEFGHIJKLMNOP")).unwrap();
        assert_eq!(merged.name, "ABCDEFGHIJKLMNOP");

        let err = merge_port(SwitchFamily::Gs30x, &port(), &named("ABCDEFGHIJKLMNOPQ")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSettingValue { setting: "name", .. }));

        let merged = merge_port(SwitchFamily::Gs30x, &port(), &named("")).unwrap();
        assert_eq!(merged.name, "");
    }

    #[test]
    fn unknown_label_is_rejected_with_choices() {
        let change = PortSettingsChange {
            speed: Some("warp".into()),
            ..PortSettingsChange::default()
        };
        match merge_port(SwitchFamily::Gs316, &port(), &change).unwrap_err() {
            CoreError::InvalidSettingValue {
                setting, accepted, ..
            } => {
                assert_eq!(setting, "speed");
                assert!(accepted.contains(&"Disable".to_owned()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn power_limit_boundaries() {
        assert_eq!(limit(SwitchFamily::Gs30x, "30.0").limit_watts, "30.0");
        assert_eq!(limit(SwitchFamily::Gs30x, "99999999.0").limit_watts, "15.0");
        assert_eq!(limit(SwitchFamily::Gs30x, "15").limit_watts, "15.0");
        assert_eq!(limit(SwitchFamily::Gs30x, "3.0").limit_watts, "3.0");
        assert_eq!(limit(SwitchFamily::Gs30x, "2.9").limit_watts, "15.0");
        assert_eq!(limit(SwitchFamily::Gs30x, "-4").limit_watts, "15.0");
    }

    #[test]
    fn power_limit_snaps_to_family_step() {
        assert_eq!(limit(SwitchFamily::Gs30x, "12.35").limit_watts, "12.3");
        assert_eq!(limit(SwitchFamily::Gs316, "12.3").limit_watts, "12.2");
        assert_eq!(limit(SwitchFamily::Gs316, "12.4").limit_watts, "12.4");
    }

    #[test]
    fn unparseable_power_limit_is_invalid() {
        let change = PoeSettingsChange {
            power_limit: Some("lots".into()),
            ..PoeSettingsChange::default()
        };
        let err = merge_poe(SwitchFamily::Gs30x, &poe(), &change, "30.0").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidSettingValue { setting: "power limit", .. }
        ));
    }

    #[test]
    fn gs316_power_limit_forces_user_limit_type() {
        assert_eq!(limit(SwitchFamily::Gs316, "20").limit_type, "2");
        assert_eq!(limit(SwitchFamily::Gs30x, "20").limit_type, "1");
        // A rejected limit leaves the type alone.
        assert_eq!(limit(SwitchFamily::Gs316, "45").limit_type, "1");
    }

    #[test]
    fn admin_state_words() {
        assert!(!merge_admin(true, Some("Disabled")));
        assert!(merge_admin(false, Some("ENABLE")));
        assert!(merge_admin(true, Some("maybe")));
        assert!(!merge_admin(false, None));
    }

    #[test]
    fn poe_labels_use_family_tables() {
        let change = PoeSettingsChange {
            priority: Some("low".into()),
            detection_type: Some("IEEE802".into()),
            ..PoeSettingsChange::default()
        };
        let merged = merge_poe(SwitchFamily::Gs316, &poe(), &change, "30.0").unwrap();
        assert_eq!(merged.priority, "1");
        assert_eq!(merged.detection_type, "2");

        let change = PoeSettingsChange {
            priority: Some("low".into()),
            ..PoeSettingsChange::default()
        };
        let merged = merge_poe(SwitchFamily::Gs30x, &poe(), &change, "30.0").unwrap();
        assert_eq!(merged.priority, "0");
    }
}
