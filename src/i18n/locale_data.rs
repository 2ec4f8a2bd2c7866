//! Currency and timezone reference data.
//!
//! The engine only ever asks yes/no and list questions of this data, so it
//! sits behind the `LocaleData` trait. `StandardLocaleData` answers them from
//! the IANA database shipped with `chrono-tz` and the ISO 4217 active list.

use chrono_tz::{Tz, TZ_VARIANTS};
use std::collections::BTreeSet;

/// Source of currency and timezone validity.
pub trait LocaleData: Send + Sync {
    fn is_valid_currency_code(&self, code: &str) -> bool;

    fn all_currency_codes(&self) -> BTreeSet<String>;

    fn is_valid_timezone(&self, timezone: &str) -> bool;

    fn all_timezones(&self) -> BTreeSet<String>;

    /// Best guess at the host's timezone.
    fn guess_local_timezone(&self) -> String;
}

/// ISO 4217 active currency codes.
const CURRENCY_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD",
    "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS",
    "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW",
    "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD",
    "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD", "NGN",
    "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR",
    "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SLL",
    "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY",
    "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UYW", "UZS", "VED", "VES",
    "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR", "XOF",
    "XPD", "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWL",
];

/// Default `LocaleData` backed by `chrono-tz` and the ISO 4217 table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLocaleData;

impl LocaleData for StandardLocaleData {
    fn is_valid_currency_code(&self, code: &str) -> bool {
        CURRENCY_CODES.binary_search(&code).is_ok()
    }

    fn all_currency_codes(&self) -> BTreeSet<String> {
        CURRENCY_CODES.iter().map(|code| code.to_string()).collect()
    }

    fn is_valid_timezone(&self, timezone: &str) -> bool {
        timezone.parse::<Tz>().is_ok()
    }

    fn all_timezones(&self) -> BTreeSet<String> {
        TZ_VARIANTS.iter().map(|tz| tz.name().to_string()).collect()
    }

    fn guess_local_timezone(&self) -> String {
        std::env::var("TZ")
            .ok()
            .filter(|tz| self.is_valid_timezone(tz))
            .unwrap_or_else(|| "UTC".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_table_is_sorted() {
        // binary_search depends on this
        let mut sorted = CURRENCY_CODES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, CURRENCY_CODES);
    }

    #[test]
    fn test_valid_currency_codes() {
        let data = StandardLocaleData;
        assert!(data.is_valid_currency_code("USD"));
        assert!(data.is_valid_currency_code("EUR"));
        assert!(data.is_valid_currency_code("GBP"));
    }

    #[test]
    fn test_invalid_currency_codes() {
        let data = StandardLocaleData;
        assert!(!data.is_valid_currency_code("usd"));
        assert!(!data.is_valid_currency_code("ABC"));
        assert!(!data.is_valid_currency_code(""));
    }

    #[test]
    fn test_all_currency_codes_contains_usd() {
        let codes = StandardLocaleData.all_currency_codes();
        assert!(codes.contains("USD"));
        assert_eq!(codes.len(), CURRENCY_CODES.len());
    }

    #[test]
    fn test_valid_timezones() {
        let data = StandardLocaleData;
        assert!(data.is_valid_timezone("UTC"));
        assert!(data.is_valid_timezone("America/New_York"));
        assert!(data.is_valid_timezone("Europe/Madrid"));
    }

    #[test]
    fn test_invalid_timezones() {
        let data = StandardLocaleData;
        assert!(!data.is_valid_timezone("Mars/Olympus_Mons"));
        assert!(!data.is_valid_timezone(""));
    }

    #[test]
    fn test_all_timezones_contains_utc() {
        let zones = StandardLocaleData.all_timezones();
        assert!(zones.contains("UTC"));
        assert!(zones.contains("Asia/Tokyo"));
    }
}
