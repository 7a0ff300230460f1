//! User agent generation

use rand::seq::SliceRandom;
use rand::Rng;

/// Generate a random but realistic user agent string
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();

    let chrome_versions = ["122.0.0.0", "123.0.0.0", "124.0.0.0", "125.0.0.0"];
    let firefox_versions = ["123.0", "124.0", "125.0"];

    let os_strings = [
        "Windows NT 10.0; Win64; x64",
        "Macintosh; Intel Mac OS X 10_15_7",
        "X11; Linux x86_64",
    ];

    let os = os_strings.choose(&mut rng).copied().unwrap_or("X11; Linux x86_64");

    // Chrome 70%, Firefox otherwise
    if rng.gen_range(0..10) < 7 {
        let chrome = chrome_versions.choose(&mut rng).copied().unwrap_or("124.0.0.0");
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            os, chrome
        )
    } else {
        let firefox = firefox_versions.choose(&mut rng).copied().unwrap_or("125.0");
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            os, firefox, firefox
        )
    }
}

/// Standard accept headers for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

/// Standard accept headers for XML/RSS requests
pub fn accept_xml() -> &'static str {
    "application/rss+xml,application/xml;q=0.9,text/xml;q=0.8,*/*;q=0.5"
}
