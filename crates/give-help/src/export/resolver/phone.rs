use crate::export::domain::Phone;

/// Country code written when a user has no default phone.
pub const FALLBACK_PHONE_COUNTRY: &str = "+55";
/// Region code written when a user has no default phone.
pub const FALLBACK_PHONE_REGION: &str = "11";

/// Picks the phone flagged as default. When several are flagged, the last one in
/// input order wins.
pub fn select_default_phone(phones: &[Phone]) -> Option<&Phone> {
    phones.iter().rev().find(|phone| phone.is_default)
}

pub(crate) fn default_phone_codes(phones: &[Phone]) -> (&str, &str) {
    match select_default_phone(phones) {
        Some(phone) => (phone.country_code.as_str(), phone.region.as_str()),
        None => (FALLBACK_PHONE_COUNTRY, FALLBACK_PHONE_REGION),
    }
}
