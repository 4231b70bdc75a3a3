//! Field resolvers flatten one domain record into a column-name → value mapping.
//!
//! Optional sub-records are swapped for their default value before any field is
//! read, so every read below is unconditional. The only failure is a proposal
//! without a ranking, for which no safe numeric default exists.

mod phone;

use std::collections::HashMap;

use super::domain::{Contact, Location, Proposal, Tag, TargetArea, User};
use super::layout::{proposal, tag, user, RecordKind};
use super::value::CellValue;

pub use phone::{select_default_phone, FALLBACK_PHONE_COUNTRY, FALLBACK_PHONE_REGION};

/// A record type with a compiled column layout and a resolver for its fields.
pub trait ExportRecord {
    const KIND: RecordKind;

    /// Identifier used when reporting a record that cannot be exported.
    fn record_id(&self) -> &str;

    fn resolve(&self) -> Result<ResolvedFields, ResolveError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("{} '{record}' is missing required field {field}", .kind.noun())]
    MissingRequiredField {
        kind: RecordKind,
        record: String,
        field: &'static str,
    },
}

/// Unordered output of a resolver; the column layout decides the order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFields {
    values: HashMap<&'static str, CellValue>,
}

impl ResolvedFields {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<CellValue>) {
        self.values.insert(column, value.into());
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    pub fn take(&mut self, column: &str) -> Option<CellValue> {
        self.values.remove(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ExportRecord for User {
    const KIND: RecordKind = RecordKind::User;

    fn record_id(&self) -> &str {
        &self.user_id
    }

    fn resolve(&self) -> Result<ResolvedFields, ResolveError> {
        let fallback_contact = Contact::default();
        let fallback_location = Location::default();
        let contact = self.contact.as_ref().unwrap_or(&fallback_contact);
        let location = self.location.as_ref().unwrap_or(&fallback_location);
        let (phone_country, phone_region) = phone::default_phone_codes(&contact.phones);

        let mut fields = ResolvedFields::with_capacity(user::COLUMNS.len());
        fields.set(user::USER_ID, self.user_id.as_str());
        fields.set(user::NAME, self.name.as_str());
        fields.set(user::DESCRIPTION, self.description.as_str());
        fields.set(user::TAGS, CellValue::joined(&self.tags));
        fields.set(user::IMAGES, CellValue::joined(&self.images));
        fields.set(user::CREATED_AT, self.created_at);
        fields.set(user::LAST_UPDATE, self.last_update);
        fields.set(user::URL, contact.url.as_str());
        fields.set(user::EMAIL, contact.email.as_str());
        fields.set(user::FACEBOOK, contact.facebook.as_str());
        fields.set(user::INSTAGRAM, contact.instagram.as_str());
        fields.set(user::TWITTER, contact.twitter.as_str());
        fields.set(user::ADDRESS, location.address.as_str());
        fields.set(user::CITY, location.city.as_str());
        fields.set(user::STATE, location.state.as_str());
        fields.set(user::ZIP_CODE, location.zip_code.unwrap_or(0));
        fields.set(user::COUNTRY, location.country.as_str());
        fields.set(user::LAT, location.lat.unwrap_or(0.0));
        fields.set(user::LON, location.lon.unwrap_or(0.0));
        fields.set(user::REGISTER_FROM, self.register_from.as_str());
        fields.set(user::PHONE_COUNTRY, phone_country);
        fields.set(user::PHONE_REGION, phone_region);
        fields.set(
            user::PHONE_NUMBERS,
            CellValue::joined(contact.phones.iter().map(|phone| &phone.phone_number)),
        );
        fields.set(user::DEVICE_ID, self.device_id.as_str());
        fields.set(user::ALLOW_SHARE_DATA, self.allow_share_data);

        Ok(fields)
    }
}

impl ExportRecord for Proposal {
    const KIND: RecordKind = RecordKind::Proposal;

    fn record_id(&self) -> &str {
        &self.proposal_id
    }

    fn resolve(&self) -> Result<ResolvedFields, ResolveError> {
        let ranking = self
            .ranking
            .ok_or_else(|| ResolveError::MissingRequiredField {
                kind: Self::KIND,
                record: self.record_id().to_string(),
                field: proposal::RANKING,
            })?;

        let fallback_area = TargetArea::default();
        let area = self.target_area.as_ref().unwrap_or(&fallback_area);

        let mut fields = ResolvedFields::with_capacity(proposal::COLUMNS.len());
        fields.set(proposal::PROPOSAL_ID, self.proposal_id.as_str());
        fields.set(proposal::USER_ID, self.user_id.as_str());
        fields.set(proposal::TITLE, self.title.as_str());
        fields.set(proposal::DESCRIPTION, self.description.as_str());
        fields.set(proposal::SIDE, self.side.as_str());
        fields.set(proposal::PROPOSAL_TYPE, self.proposal_type.as_str());
        fields.set(proposal::TAGS, CellValue::joined(&self.tags));
        fields.set(proposal::IS_ACTIVE, self.is_active);
        fields.set(proposal::CREATED_AT, self.created_at);
        fields.set(proposal::LAST_UPDATE, self.last_update);
        fields.set(proposal::PROPOSAL_VALIDATE, self.proposal_validate);
        fields.set(proposal::CITY, area.city.as_str());
        fields.set(proposal::STATE, area.state.as_str());
        fields.set(proposal::COUNTRY, area.country.as_str());
        fields.set(proposal::AREA_TAGS, CellValue::joined(&area.area_tags));
        fields.set(proposal::LAT, area.lat.unwrap_or(0.0));
        fields.set(proposal::LON, area.lon.unwrap_or(0.0));
        fields.set(proposal::DISTANCE, area.distance);
        fields.set(proposal::IMAGES, CellValue::joined(&self.images));
        fields.set(proposal::ESTIMATED_VALUE, self.estimated_value.unwrap_or(0.0));
        fields.set(proposal::EXPOSE_USER_DATA, self.expose_user_data);
        fields.set(
            proposal::DATA_TO_SHARE,
            CellValue::joined(self.data_to_share.iter().map(|code| code.as_str())),
        );
        fields.set(proposal::RANKING, ranking);

        Ok(fields)
    }
}

impl ExportRecord for Tag {
    const KIND: RecordKind = RecordKind::Tag;

    fn record_id(&self) -> &str {
        self.as_str()
    }

    fn resolve(&self) -> Result<ResolvedFields, ResolveError> {
        let mut fields = ResolvedFields::with_capacity(1);
        fields.set(tag::TAG, self.as_str());
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::domain::{DataToShare, Phone, ProposalType, Side};

    fn text(fields: &ResolvedFields, column: &str) -> String {
        fields
            .get(column)
            .and_then(CellValue::as_text)
            .unwrap_or_else(|| panic!("{column} should be text"))
            .to_string()
    }

    #[test]
    fn user_without_contact_or_location_gets_defaults() {
        let user = User {
            user_id: "u1".to_string(),
            name: "A".to_string(),
            ..User::default()
        };

        let fields = user.resolve().expect("user resolves");
        assert_eq!(fields.len(), user::COLUMNS.len());
        assert_eq!(text(&fields, user::PHONE_COUNTRY), "+55");
        assert_eq!(text(&fields, user::PHONE_REGION), "11");
        assert_eq!(text(&fields, user::PHONE_NUMBERS), "");
        assert_eq!(text(&fields, user::URL), "");
        assert_eq!(text(&fields, user::CITY), "");
        assert_eq!(fields.get(user::LAT), Some(&CellValue::Number(0.0)));
        assert_eq!(fields.get(user::LON), Some(&CellValue::Number(0.0)));
        assert_eq!(fields.get(user::ZIP_CODE), Some(&CellValue::Integer(0)));
    }

    #[test]
    fn present_location_with_missing_numbers_defaults_to_zero() {
        let user = User {
            user_id: "u2".to_string(),
            location: Some(Location {
                city: "Campinas".to_string(),
                lat: Some(-22.9),
                ..Location::default()
            }),
            ..User::default()
        };

        let fields = user.resolve().expect("user resolves");
        assert_eq!(text(&fields, user::CITY), "Campinas");
        assert_eq!(fields.get(user::LAT), Some(&CellValue::Number(-22.9)));
        assert_eq!(fields.get(user::LON), Some(&CellValue::Number(0.0)));
        assert_eq!(fields.get(user::ZIP_CODE), Some(&CellValue::Integer(0)));
    }

    #[test]
    fn user_phone_columns_use_default_phone() {
        let user = User {
            user_id: "u3".to_string(),
            contact: Some(Contact {
                phones: vec![
                    Phone {
                        phone_number: "111".to_string(),
                        country_code: "+1".to_string(),
                        region: "212".to_string(),
                        is_default: false,
                    },
                    Phone {
                        phone_number: "222".to_string(),
                        country_code: "+351".to_string(),
                        region: "21".to_string(),
                        is_default: true,
                    },
                ],
                ..Contact::default()
            }),
            ..User::default()
        };

        let fields = user.resolve().expect("user resolves");
        assert_eq!(text(&fields, user::PHONE_NUMBERS), "111,222");
        assert_eq!(text(&fields, user::PHONE_COUNTRY), "+351");
        assert_eq!(text(&fields, user::PHONE_REGION), "21");
    }

    #[test]
    fn proposal_without_ranking_is_rejected() {
        let proposal = Proposal {
            proposal_id: "p1".to_string(),
            ranking: None,
            ..Proposal::default()
        };

        let error = proposal.resolve().expect_err("ranking required");
        assert_eq!(
            error,
            ResolveError::MissingRequiredField {
                kind: RecordKind::Proposal,
                record: "p1".to_string(),
                field: "Ranking",
            }
        );
        assert_eq!(
            error.to_string(),
            "proposal 'p1' is missing required field Ranking"
        );
    }

    #[test]
    fn proposal_without_target_area_gets_zeroes() {
        let proposal = Proposal {
            proposal_id: "p2".to_string(),
            data_to_share: vec![DataToShare::Phone, DataToShare::Email],
            ranking: Some(4.5),
            ..Proposal::default()
        };

        let fields = proposal.resolve().expect("proposal resolves");
        assert_eq!(fields.len(), proposal::COLUMNS.len());
        assert_eq!(text(&fields, proposal::CITY), "");
        assert_eq!(text(&fields, proposal::AREA_TAGS), "");
        assert_eq!(fields.get(proposal::LAT), Some(&CellValue::Number(0.0)));
        assert_eq!(fields.get(proposal::LON), Some(&CellValue::Number(0.0)));
        assert_eq!(fields.get(proposal::DISTANCE), Some(&CellValue::Number(0.0)));
        assert_eq!(
            fields.get(proposal::ESTIMATED_VALUE),
            Some(&CellValue::Number(0.0))
        );
        assert_eq!(text(&fields, proposal::DATA_TO_SHARE), "phone,email");
        assert_eq!(fields.get(proposal::RANKING), Some(&CellValue::Number(4.5)));
    }

    #[test]
    fn unrecognised_codes_are_exported_as_given() {
        let proposal = Proposal {
            proposal_id: "p3".to_string(),
            side: Side::Other("both".to_string()),
            proposal_type: ProposalType::Other("barter".to_string()),
            data_to_share: vec![DataToShare::Other("whatsapp".to_string()), DataToShare::Url],
            ranking: Some(1.0),
            ..Proposal::default()
        };

        let fields = proposal.resolve().expect("proposal resolves");
        assert_eq!(text(&fields, proposal::SIDE), "both");
        assert_eq!(text(&fields, proposal::PROPOSAL_TYPE), "barter");
        assert_eq!(text(&fields, proposal::DATA_TO_SHARE), "whatsapp,url");
    }

    #[test]
    fn tag_maps_to_single_column() {
        let fields = Tag::new("food").resolve().expect("tag resolves");
        assert_eq!(fields.len(), 1);
        assert_eq!(text(&fields, tag::TAG), "food");
    }
}
