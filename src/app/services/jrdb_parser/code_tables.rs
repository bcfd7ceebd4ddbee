//! Static JRDB code tables
//!
//! Lookups never fail: an unknown code simply has no label.

/// 場コード: racecourse venues
pub const VENUES: &[(&str, &str)] = &[
    ("01", "札幌"),
    ("02", "函館"),
    ("03", "福島"),
    ("04", "新潟"),
    ("05", "東京"),
    ("06", "中山"),
    ("07", "中京"),
    ("08", "京都"),
    ("09", "阪神"),
    ("10", "小倉"),
];

/// 芝ダ障害コード
pub const COURSE_TYPES: &[(&str, &str)] = &[("1", "turf"), ("2", "dirt"), ("3", "obstacle")];

/// 馬場状態コード, two-digit detailed codes followed by the one-digit forms
pub const TRACK_CONDITIONS: &[(&str, &str)] = &[
    ("10", "良"),
    ("11", "速良"),
    ("12", "遅良"),
    ("20", "稍重"),
    ("21", "速稍重"),
    ("22", "遅稍重"),
    ("30", "重"),
    ("31", "速重"),
    ("32", "遅重"),
    ("40", "不良"),
    ("41", "速不良"),
    ("42", "遅不良"),
    ("1", "良"),
    ("2", "稍重"),
    ("3", "重"),
    ("4", "不良"),
];

/// 天候コード
pub const WEATHER: &[(&str, &str)] = &[
    ("1", "晴"),
    ("2", "曇"),
    ("3", "小雨"),
    ("4", "雨"),
    ("5", "小雪"),
    ("6", "雪"),
];

/// 性別コード
pub const SEXES: &[(&str, &str)] = &[("1", "牡"), ("2", "牝"), ("3", "セン")];

/// グレード: codes without an entry fall back to the race condition
pub const GRADES: &[(&str, &str)] = &[("1", "G1"), ("2", "G2"), ("3", "G3"), ("5", "Listed")];

/// 条件 value that marks an open-class race
pub const OPEN_CONDITION: &str = "OP";

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    let code = code.trim();
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| *label)
}

pub fn venue_name(code: &str) -> Option<&'static str> {
    lookup(VENUES, code)
}

pub fn course_type(code: &str) -> Option<&'static str> {
    lookup(COURSE_TYPES, code)
}

pub fn track_condition(code: &str) -> Option<&'static str> {
    lookup(TRACK_CONDITIONS, code)
}

pub fn weather(code: &str) -> Option<&'static str> {
    lookup(WEATHER, code)
}

pub fn sex(code: &str) -> Option<&'static str> {
    lookup(SEXES, code)
}

/// 右左: `1` right, `2` left, anything else straight
pub fn direction(code: &str) -> &'static str {
    match code {
        "1" => "right",
        "2" => "left",
        _ => "straight",
    }
}

/// Race class by precedence: grade label, then `Open`, then the raw condition
pub fn race_class(grade_code: &str, race_condition: &str) -> String {
    if let Some(label) = lookup(GRADES, grade_code) {
        label.to_string()
    } else if race_condition == OPEN_CONDITION {
        "Open".to_string()
    } else {
        race_condition.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_lookup() {
        assert_eq!(venue_name("06"), Some("中山"));
        assert_eq!(venue_name("10"), Some("小倉"));
        assert_eq!(venue_name("11"), None);
        assert_eq!(venue_name(""), None);
    }

    #[test]
    fn test_track_condition_accepts_both_code_widths() {
        assert_eq!(track_condition("10"), Some("良"));
        assert_eq!(track_condition("22"), Some("遅稍重"));
        assert_eq!(track_condition("4"), Some("不良"));
        assert_eq!(track_condition(" 3"), Some("重"));
        assert_eq!(track_condition("50"), None);
    }

    #[test]
    fn test_small_tables() {
        assert_eq!(course_type("1"), Some("turf"));
        assert_eq!(course_type("9"), None);
        assert_eq!(weather("3"), Some("小雨"));
        assert_eq!(weather("0"), None);
        assert_eq!(sex("3"), Some("セン"));
        assert_eq!(direction("1"), "right");
        assert_eq!(direction("2"), "left");
        assert_eq!(direction("3"), "straight");
        assert_eq!(direction(""), "straight");
    }

    #[test]
    fn test_race_class_precedence() {
        assert_eq!(race_class("1", "OP"), "G1");
        assert_eq!(race_class("2", "A3"), "G2");
        assert_eq!(race_class("3", ""), "G3");
        assert_eq!(race_class("5", "OP"), "Listed");
        assert_eq!(race_class("", "OP"), "Open");
        assert_eq!(race_class("4", "OP"), "Open");
        assert_eq!(race_class("", "A3"), "A3");
        assert_eq!(race_class("", ""), "");
    }
}
