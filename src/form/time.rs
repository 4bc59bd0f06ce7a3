//! Time pickers: hour/minute/meridiem selects and the grouped timezone select.

use crate::form::attributes::{Attributes, Field};
use crate::form::base::SelectOption;
use crate::form::helper::FormHelper;
use crate::form::output::Markup;

const HOURS: [&str; 12] = ["12", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"];

/// Top-level regions shown in the timezone select, in identifier order.
pub const CONTINENTS: [&str; 10] = [
    "Africa", "America", "Antarctica", "Arctic", "Asia", "Atlantic", "Australia", "Europe", "Indian", "Pacific",
];

/// Backward-compatibility links in the tz database that sit under a listed
/// continent. They duplicate a canonical zone and stay out of the select.
const LEGACY_ALIASES: &[&str] = &[
    "Africa/Asmera",
    "Africa/Timbuktu",
    "America/Argentina/ComodRivadavia",
    "America/Atka",
    "America/Buenos_Aires",
    "America/Catamarca",
    "America/Coral_Harbour",
    "America/Cordoba",
    "America/Ensenada",
    "America/Fort_Wayne",
    "America/Godthab",
    "America/Indianapolis",
    "America/Jujuy",
    "America/Knox_IN",
    "America/Louisville",
    "America/Mendoza",
    "America/Montreal",
    "America/Nipigon",
    "America/Pangnirtung",
    "America/Porto_Acre",
    "America/Rainy_River",
    "America/Rosario",
    "America/Santa_Isabel",
    "America/Shiprock",
    "America/Thunder_Bay",
    "America/Virgin",
    "America/Yellowknife",
    "Antarctica/South_Pole",
    "Asia/Ashkhabad",
    "Asia/Calcutta",
    "Asia/Choibalsan",
    "Asia/Chongqing",
    "Asia/Chungking",
    "Asia/Dacca",
    "Asia/Harbin",
    "Asia/Istanbul",
    "Asia/Kashgar",
    "Asia/Katmandu",
    "Asia/Macao",
    "Asia/Rangoon",
    "Asia/Saigon",
    "Asia/Tel_Aviv",
    "Asia/Thimbu",
    "Asia/Ujung_Pandang",
    "Asia/Ulan_Bator",
    "Atlantic/Faeroe",
    "Atlantic/Jan_Mayen",
    "Australia/ACT",
    "Australia/Canberra",
    "Australia/Currie",
    "Australia/LHI",
    "Australia/NSW",
    "Australia/North",
    "Australia/Queensland",
    "Australia/South",
    "Australia/Tasmania",
    "Australia/Victoria",
    "Australia/West",
    "Australia/Yancowinna",
    "Europe/Belfast",
    "Europe/Kiev",
    "Europe/Nicosia",
    "Europe/Tiraspol",
    "Europe/Uzhgorod",
    "Europe/Zaporozhye",
    "Pacific/Enderbury",
    "Pacific/Johnston",
    "Pacific/Ponape",
    "Pacific/Samoa",
    "Pacific/Truk",
    "Pacific/Yap",
];

/// Leading integer of `s`, or 0. Digit runs too long for `i64` saturate.
fn int_value(s: &str) -> i64 {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let number = &s[..end];
    match number.parse() {
        Ok(n) => n,
        Err(_) if number.trim_start_matches(['-', '+']).is_empty() => 0,
        Err(_) if number.starts_with('-') => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Round a minute up to the next multiple of five: "37" -> 40, "40" -> 40.
pub fn round_minute(mval: &str) -> i64 {
    let m = int_value(mval);
    m.saturating_add(4).div_euclid(5) * 5
}

/// Canonical IANA identifiers from the bundled tz database, without the
/// backward-compatibility aliases.
pub fn timezone_identifiers() -> Vec<&'static str> {
    chrono_tz::TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| !LEGACY_ALIASES.contains(name))
        .collect()
}

/// Group identifiers by continent. Entries are sorted by (continent, city,
/// subcity) so each continent's entries are contiguous; identifiers outside
/// [`CONTINENTS`] are skipped.
pub fn timezone_options<'z>(identifiers: impl IntoIterator<Item = &'z str>) -> Vec<SelectOption> {
    let mut zones: Vec<(&str, &str, &str)> = identifiers
        .into_iter()
        .filter_map(|id| {
            let mut parts = id.splitn(3, '/');
            let continent = parts.next().unwrap_or_default();
            let city = parts.next().unwrap_or_default();
            let subcity = parts.next().unwrap_or_default();
            CONTINENTS
                .contains(&continent)
                .then_some((continent, city, subcity))
        })
        .collect();
    zones.sort();
    zones.dedup();

    let mut groups: Vec<SelectOption> = Vec::new();
    for (continent, city, subcity) in zones {
        let (value, label) = if city.is_empty() {
            (continent.to_string(), continent.to_string())
        } else {
            let place = if subcity.is_empty() {
                city.to_string()
            } else {
                format!("{}/{}", city, subcity)
            };
            (format!("{}/{}", continent, place), place.replace('_', " "))
        };
        let same_group = matches!(
            groups.last(),
            Some(SelectOption::Group { label: current, .. }) if current == continent
        );
        if !same_group {
            groups.push(SelectOption::group(continent, Vec::new()));
        }
        if let Some(SelectOption::Group { items, .. }) = groups.last_mut() {
            items.push((value, label));
        }
    }
    groups
}

impl<'a> FormHelper<'a> {
    /// Three selects named `hid`, `mid` and `pid`: hour (12, 1..11), minute in
    /// five-minute steps, and am/pm. Missing values come from the clock; the
    /// minute is rounded up to the next multiple of five.
    pub fn hour_min(
        &self,
        hid: &str,
        mid: &str,
        pid: &str,
        hval: Option<&str>,
        mval: Option<&str>,
        pval: Option<&str>,
    ) -> Markup {
        let now = self.clock().now();
        let hval = hval
            .map(str::to_string)
            .unwrap_or_else(|| now.format("%-I").to_string());
        let mval = mval
            .map(str::to_string)
            .unwrap_or_else(|| now.format("%M").to_string());
        let pval = pval
            .map(str::to_string)
            .unwrap_or_else(|| now.format("%P").to_string());

        let renderer = self.renderer();
        let named = |name: &str| Attributes::new().with("name", name).with("id", name);

        let hour = int_value(&hval);
        let hours: Vec<SelectOption> = HOURS.iter().map(|h| SelectOption::item(*h, *h)).collect();
        let hour_selected: Vec<String> = HOURS
            .iter()
            .filter(|h| int_value(h) == hour)
            .map(|h| h.to_string())
            .collect();

        let minute = round_minute(&mval);
        let minutes: Vec<SelectOption> = (0..12)
            .map(|i| {
                let m = format!("{:02}", i * 5);
                SelectOption::item(m.clone(), m)
            })
            .collect();
        let minute_selected: Vec<String> = (0..12)
            .filter(|i| i * 5 == minute)
            .map(|i| format!("{:02}", i * 5))
            .collect();

        let meridiem = vec![SelectOption::item("am", "am"), SelectOption::item("pm", "pm")];
        let meridiem_selected: Vec<String> = if pval == "pm" {
            vec!["pm".to_string()]
        } else {
            Vec::new()
        };

        let mut out = renderer.select(&named(hid), &hours, &hour_selected, "");
        out.push_str(&renderer.select(&named(mid), &minutes, &minute_selected, ""));
        out.push_str(&renderer.select(&named(pid), &meridiem, &meridiem_selected, ""));
        out.into()
    }

    /// Single select of all timezones grouped by continent. A `selected`
    /// attribute overrides the argument; with neither, the configured default
    /// timezone is preselected.
    pub fn timezones(&self, field: impl Into<Field>, selected: Option<&str>, extra: &str) -> Markup {
        self.timezones_from(timezone_identifiers(), field, selected, extra)
    }

    pub(crate) fn timezones_from<'z>(
        &self,
        identifiers: impl IntoIterator<Item = &'z str>,
        field: impl Into<Field>,
        selected: Option<&str>,
        extra: &str,
    ) -> Markup {
        let mut attrs = field.into().into_attributes();
        let from_attrs = attrs.remove("selected");
        let selected = from_attrs
            .as_deref()
            .or(selected)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.config().default_timezone.as_str())
            .to_string();
        let options = timezone_options(identifiers);
        self.renderer()
            .select(&attrs, &options, &[selected], extra)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::context::{FixedClock, StaticView};
    use chrono::NaiveDate;

    fn clock(h: u32, m: u32) -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .and_then(|d| d.and_hms_opt(h, m, 0))
                .expect("valid time"),
        )
    }

    #[test]
    fn minutes_round_up_to_five() {
        assert_eq!(round_minute("37"), 40);
        assert_eq!(round_minute("40"), 40);
        assert_eq!(round_minute("0"), 0);
        assert_eq!(round_minute("57"), 60);
        assert_eq!(round_minute("x"), 0);
        assert_eq!(round_minute("-"), 0);
    }

    #[test]
    fn oversized_minutes_saturate() {
        assert_eq!(round_minute("9223372036854775807"), i64::MAX / 5 * 5);
        assert_eq!(round_minute("99999999999999999999"), i64::MAX / 5 * 5);
        assert!(round_minute("-99999999999999999999") <= 0);

        let view = StaticView::new("calls", "edit");
        let helper = FormHelper::new(&view);
        let html = helper.hour_min("h", "m", "p", Some("1"), Some("9223372036854775807"), Some("am"));
        assert!(html.contains("<option value=\"1\" selected=\"selected\">1</option>"));
        assert!(html.contains("<option value=\"55\">55</option>"));
        assert_eq!(html.matches("selected=\"selected\"").count(), 1);
    }

    #[test]
    fn hour_min_selects_rounded_minute() {
        let view = StaticView::new("calls", "edit");
        let helper = FormHelper::new(&view);
        let html = helper.hour_min("hour", "minute", "pm", Some("3"), Some("37"), Some("pm"));
        assert!(html.contains("<option value=\"40\" selected=\"selected\">40</option>"));
        assert!(html.contains("<option value=\"3\" selected=\"selected\">3</option>"));
        assert!(html.contains("<option value=\"pm\" selected=\"selected\">pm</option>"));
        assert!(html.contains("<select id=\"minute\" name=\"minute\">"));
    }

    #[test]
    fn hour_min_defaults_come_from_clock() {
        let view = StaticView::new("calls", "edit");
        let fixed = clock(14, 7);
        let helper = FormHelper::new(&view).with_clock(&fixed);
        let html = helper.hour_min("h", "m", "p", None, None, None);
        assert!(html.contains("<option value=\"2\" selected=\"selected\">2</option>"));
        assert!(html.contains("<option value=\"10\" selected=\"selected\">10</option>"));
        assert!(html.contains("<option value=\"pm\" selected=\"selected\">pm</option>"));
    }

    #[test]
    fn morning_leaves_am_unmarked() {
        let view = StaticView::new("calls", "edit");
        let fixed = clock(0, 0);
        let helper = FormHelper::new(&view).with_clock(&fixed);
        let html = helper.hour_min("h", "m", "p", None, None, None);
        assert!(html.contains("<option value=\"12\" selected=\"selected\">12</option>"));
        assert!(html.contains("<option value=\"am\">am</option>"));
        assert!(!html.contains("selected=\"selected\">pm"));
    }

    const SAMPLE: [&str; 8] = [
        "Europe/London",
        "America/New_York",
        "UTC",
        "Africa/Abidjan",
        "America/Argentina/Buenos_Aires",
        "Europe/Berlin",
        "US/Eastern",
        "America/Chicago",
    ];

    #[test]
    fn one_group_per_continent_without_interleaving() {
        let groups = timezone_options(SAMPLE);
        let labels: Vec<&str> = groups
            .iter()
            .map(|g| match g {
                SelectOption::Group { label, .. } => label.as_str(),
                SelectOption::Item { .. } => "",
            })
            .collect();
        assert_eq!(labels, vec!["Africa", "America", "Europe"]);
        match &groups[1] {
            SelectOption::Group { items, .. } => assert_eq!(
                items,
                &vec![
                    ("America/Argentina/Buenos_Aires".to_string(), "Argentina/Buenos Aires".to_string()),
                    ("America/Chicago".to_string(), "Chicago".to_string()),
                    ("America/New_York".to_string(), "New York".to_string()),
                ]
            ),
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn timezones_preselect_explicit_or_default() {
        let view = StaticView::new("settings", "index");
        let helper = FormHelper::new(&view);

        let html = helper.timezones_from(SAMPLE, "timezone", Some("Europe/Berlin"), "");
        assert!(html.contains("<option value=\"Europe/Berlin\" selected=\"selected\">Berlin</option>"));
        assert_eq!(html.as_str().matches("<optgroup").count(), 3);

        let mut config = crate::config::FormConfig::default();
        config.default_timezone = "America/Chicago".into();
        let helper = FormHelper::new(&view).with_config(config);
        let html = helper.timezones_from(SAMPLE, "timezone", Some(""), "");
        assert!(html.contains("<option value=\"America/Chicago\" selected=\"selected\">Chicago</option>"));
    }

    #[test]
    fn bundled_database_covers_common_zones() {
        let ids = timezone_identifiers();
        assert!(ids.contains(&"Europe/London"));
        let groups = timezone_options(ids);
        assert_eq!(groups.len(), CONTINENTS.len());
    }

    #[test]
    fn aliases_stay_out_of_the_list() {
        let ids = timezone_identifiers();
        for alias in ["Asia/Calcutta", "Australia/ACT", "Europe/Kiev", "Asia/Saigon", "America/Buenos_Aires"] {
            assert!(!ids.contains(&alias), "{} listed", alias);
        }
        assert!(ids.contains(&"Asia/Kolkata"));
        assert!(ids.contains(&"Europe/Kyiv"));
        assert!(ids.contains(&"America/Argentina/Buenos_Aires"));

        let view = StaticView::new("settings", "index");
        let html = FormHelper::new(&view).timezones("timezone", Some("Asia/Kolkata"), "");
        assert_eq!(html.matches(">Kolkata<").count(), 1);
        assert!(!html.contains("Calcutta"));
    }
}
