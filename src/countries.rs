//! Country codes accepted by the job search provider.

pub const COUNTRIES: &[(&str, &str)] = &[
    ("us", "United States"),
    ("in", "India"),
    ("ca", "Canada"),
    ("gb", "United Kingdom"),
    ("au", "Australia"),
    ("de", "Germany"),
    ("fr", "France"),
    ("sg", "Singapore"),
    ("jp", "Japan"),
    ("za", "South Africa"),
    ("br", "Brazil"),
    ("ae", "United Arab Emirates"),
    ("it", "Italy"),
    ("es", "Spain"),
    ("nl", "Netherlands"),
    ("se", "Sweden"),
    ("ch", "Switzerland"),
    ("mx", "Mexico"),
    ("ie", "Ireland"),
    ("ru", "Russia"),
    ("cn", "China"),
    ("kr", "South Korea"),
    ("hk", "Hong Kong"),
    ("fi", "Finland"),
    ("be", "Belgium"),
    ("pl", "Poland"),
    ("tr", "Turkey"),
    ("ar", "Argentina"),
    ("dk", "Denmark"),
    ("no", "Norway"),
    ("nz", "New Zealand"),
    ("pt", "Portugal"),
    ("cz", "Czech Republic"),
    ("il", "Israel"),
    ("my", "Malaysia"),
    ("th", "Thailand"),
    ("ph", "Philippines"),
    ("id", "Indonesia"),
    ("sa", "Saudi Arabia"),
    ("cl", "Chile"),
    ("co", "Colombia"),
    ("at", "Austria"),
    ("hu", "Hungary"),
    ("gr", "Greece"),
    ("ro", "Romania"),
    ("ua", "Ukraine"),
    ("sk", "Slovakia"),
    ("bg", "Bulgaria"),
    ("hr", "Croatia"),
    ("si", "Slovenia"),
    ("lt", "Lithuania"),
    ("lv", "Latvia"),
    ("ee", "Estonia"),
];

/// Display name for a supported country code, `None` if unsupported.
pub fn name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn is_supported(code: &str) -> bool {
    name(code).is_some()
}

/// Comma-separated `code (Name)` listing for error messages.
pub fn supported_list() -> String {
    COUNTRIES
        .iter()
        .map(|(code, name)| format!("{code} ({name})"))
        .collect::<Vec<_>>()
        .join(", ")
}
