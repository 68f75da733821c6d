use std::sync::LazyLock;

use chrono::{NaiveDateTime, Weekday};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::snapshot::{Dialect, Snapshot};

const WRITE_COUNTER_FIELD: &str = "data units written";

const LOCALE_FORMAT: &str = "%b %d %H:%M:%S %Y";
const ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PLATFORM_FORMAT: &str = "%c";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static extraction pattern")
}

static LOCAL_TIME: LazyLock<Regex> = LazyLock::new(|| compile(r"Local Time is:[ \t]+([^\r\n]+)"));
static MODEL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:Device Model|Model Number|Product):[ \t]+([^\r\n]+)"));
static SERIAL: LazyLock<Regex> = LazyLock::new(|| compile(r"Serial [Nn]umber:[ \t]+([^\r\n]+)"));

static USER_CAPACITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"User Capacity:[ \t]+([0-9][0-9,.']*)[ \t]+bytes"));
static NAMESPACE_CAPACITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Namespace 1 Size/Capacity:[ \t]+([0-9][0-9,.']*)"));
static TOTAL_NVM_CAPACITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Total NVM Capacity:[ \t]+([0-9][0-9,.']*)"));

static DATA_UNITS_WRITTEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Data Units Written:[ \t]+([0-9][0-9,.']*)"));
static DATA_UNITS_READ: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Data Units Read:[ \t]+([0-9][0-9,.']*)"));
static POWER_ON_HOURS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Power On Hours:[ \t]+([0-9][0-9,.']*)"));
static PERCENTAGE_USED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Percentage Used:[ \t]+([0-9]+)%"));
static AVAILABLE_SPARE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Available Spare:[ \t]+([0-9]+)%"));

// ID NAME FLAG VALUE WORST THRESH TYPE UPDATED WHEN_FAILED RAW_VALUE
static ATTRIBUTE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?m)^[ \t]*([0-9]+)[ \t]+(\S+)(?:[ \t]+\S+){7}[ \t]+([0-9][0-9,]*)",
    )
});

type TimestampGrammar = (&'static str, fn(&str) -> Option<NaiveDateTime>);

// First grammar that parses the `Local Time is:` value wins.
const TIMESTAMP_GRAMMARS: [TimestampGrammar; 4] = [
    ("locale with zone", parse_locale_with_zone),
    ("locale", parse_locale),
    ("iso", parse_iso),
    ("platform default", parse_platform_default),
];

type CounterRule = fn(&str) -> Option<u64>;

pub fn extract(text: &str, origin: &str) -> Result<Snapshot, ExtractError> {
    let dialect = detect_dialect(text);
    debug!(origin, dialect = dialect.label(), "detected dialect");

    let data_units_written =
        write_counter(text, dialect).ok_or_else(|| ExtractError::MissingField {
            field: WRITE_COUNTER_FIELD,
            origin: origin.to_string(),
        })?;

    let mut snapshot = Snapshot::new(data_units_written, dialect);
    snapshot.timestamp = extract_timestamp(text, origin);
    snapshot.model = capture_text(&MODEL, text);
    snapshot.serial = capture_text(&SERIAL, text);
    snapshot.capacity_bytes = [&*USER_CAPACITY, &*NAMESPACE_CAPACITY, &*TOTAL_NVM_CAPACITY]
        .into_iter()
        .find_map(|re| capture_number(re, text));

    match dialect {
        Dialect::Flash => {
            snapshot.data_units_read = capture_number(&DATA_UNITS_READ, text);
            snapshot.power_on_hours = capture_number(&POWER_ON_HOURS, text);
            snapshot.percentage_used = capture_percent(&PERCENTAGE_USED, text);
            snapshot.available_spare = capture_percent(&AVAILABLE_SPARE, text);
        }
        Dialect::Legacy => {
            snapshot.power_on_hours = attribute_value(text, 9, "Power_On_Hours");
        }
    }

    Ok(snapshot)
}

pub fn detect_dialect(text: &str) -> Dialect {
    if text.contains("NVMe") || text.contains("NVME") {
        Dialect::Flash
    } else {
        Dialect::Legacy
    }
}

fn write_counter(text: &str, dialect: Dialect) -> Option<u64> {
    let flash: CounterRule = |text| capture_number(&DATA_UNITS_WRITTEN, text);
    let legacy: CounterRule = |text| attribute_value(text, 241, "Total_LBAs_Written");

    let (primary, fallback) = match dialect {
        Dialect::Flash => (flash, legacy),
        Dialect::Legacy => (legacy, flash),
    };

    primary(text).or_else(|| {
        let value = fallback(text);
        if value.is_some() {
            debug!(dialect = dialect.label(), "write counter found by the other dialect's rule");
        }
        value
    })
}

fn extract_timestamp(text: &str, origin: &str) -> Option<NaiveDateTime> {
    let raw = capture_text(&LOCAL_TIME, text)?;
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    for (name, parse) in TIMESTAMP_GRAMMARS {
        if let Some(ts) = parse(&normalized) {
            debug!(origin, grammar = name, "parsed local time");
            return Some(ts);
        }
    }

    warn!(origin, value = %raw, "unrecognised local time format, ordering checks disabled");
    None
}

fn parse_locale_with_zone(value: &str) -> Option<NaiveDateTime> {
    let (rest, zone) = value.rsplit_once(' ')?;
    if !is_zone_token(zone) {
        return None;
    }
    parse_locale(rest)
}

fn parse_locale(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(strip_weekday(value), LOCALE_FORMAT).ok()
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, ISO_FORMAT).ok()
}

fn parse_platform_default(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, PLATFORM_FORMAT).ok()
}

// The weekday is redundant with the date and tools do not always agree on it.
fn strip_weekday(value: &str) -> &str {
    match value.split_once(' ') {
        Some((head, rest)) if head.parse::<Weekday>().is_ok() => rest,
        _ => value,
    }
}

fn is_zone_token(token: &str) -> bool {
    let alphabetic = !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic());
    let offset = token.len() >= 3
        && token.starts_with(['+', '-'])
        && token[1..].chars().all(|c| c.is_ascii_digit() || c == ':');
    alphabetic || offset
}

fn capture_text(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn capture_number(re: &Regex, text: &str) -> Option<u64> {
    parse_grouped(re.captures(text)?.get(1)?.as_str())
}

fn capture_percent(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn parse_grouped(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn attribute_value(text: &str, id: u32, name: &str) -> Option<u64> {
    ATTRIBUTE_ROW.captures_iter(text).find_map(|row| {
        let row_id = row.get(1)?.as_str().parse::<u32>().ok();
        let row_name = row.get(2)?.as_str();
        if row_id == Some(id) || row_name == name {
            parse_grouped(row.get(3)?.as_str())
        } else {
            None
        }
    })
}
