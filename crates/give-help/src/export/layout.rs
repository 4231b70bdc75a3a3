//! Compiled column layouts.
//!
//! Output shape is declared here rather than derived from any record, so a record
//! carrying extra or missing optional data never changes column order or count.
//! The same list feeds the header and the projection of every resolved row.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Proposal,
    Tag,
}

impl RecordKind {
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::User => "Users",
            Self::Proposal => "Proposals",
            Self::Tag => "Tags",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Proposal => "proposals",
            Self::Tag => "tags",
        }
    }

    /// Singular name for messages about one record.
    pub const fn noun(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Proposal => "proposal",
            Self::Tag => "tag",
        }
    }

    pub fn layout(self) -> &'static ColumnLayout {
        match self {
            Self::User => &USER_LAYOUT,
            Self::Proposal => &PROPOSAL_LAYOUT,
            Self::Tag => &TAG_LAYOUT,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    kind: RecordKind,
    columns: &'static [&'static str],
}

impl ColumnLayout {
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    pub const fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|candidate| *candidate == column)
    }

    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.to_string()).collect()
    }
}

pub mod user {
    pub const USER_ID: &str = "UserID";
    pub const NAME: &str = "Name";
    pub const DESCRIPTION: &str = "Description";
    pub const TAGS: &str = "Tags";
    pub const IMAGES: &str = "Images";
    pub const CREATED_AT: &str = "CreatedAt";
    pub const LAST_UPDATE: &str = "LastUpdate";
    pub const URL: &str = "URL";
    pub const EMAIL: &str = "Email";
    pub const FACEBOOK: &str = "Facebook";
    pub const INSTAGRAM: &str = "Instagram";
    pub const TWITTER: &str = "Twitter";
    pub const ADDRESS: &str = "Address";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const ZIP_CODE: &str = "ZipCode";
    pub const COUNTRY: &str = "Country";
    pub const LAT: &str = "Lat";
    pub const LON: &str = "Lon";
    pub const REGISTER_FROM: &str = "RegisterFrom";
    /// Country code of the default phone.
    pub const PHONE_COUNTRY: &str = "PCountry";
    /// Region code of the default phone.
    pub const PHONE_REGION: &str = "PRegion";
    /// Every phone number, default or not.
    pub const PHONE_NUMBERS: &str = "PNumbers";
    pub const DEVICE_ID: &str = "DeviceID";
    pub const ALLOW_SHARE_DATA: &str = "AllowShareData";

    pub const COLUMNS: [&str; 25] = [
        USER_ID,
        NAME,
        DESCRIPTION,
        TAGS,
        IMAGES,
        CREATED_AT,
        LAST_UPDATE,
        URL,
        EMAIL,
        FACEBOOK,
        INSTAGRAM,
        TWITTER,
        ADDRESS,
        CITY,
        STATE,
        ZIP_CODE,
        COUNTRY,
        LAT,
        LON,
        REGISTER_FROM,
        PHONE_COUNTRY,
        PHONE_REGION,
        PHONE_NUMBERS,
        DEVICE_ID,
        ALLOW_SHARE_DATA,
    ];
}

pub mod proposal {
    pub const PROPOSAL_ID: &str = "ProposalID";
    pub const USER_ID: &str = "UserID";
    pub const TITLE: &str = "Title";
    pub const DESCRIPTION: &str = "Description";
    pub const SIDE: &str = "Side";
    pub const PROPOSAL_TYPE: &str = "ProposalType";
    pub const TAGS: &str = "Tags";
    pub const IS_ACTIVE: &str = "IsActive";
    pub const CREATED_AT: &str = "CreatedAt";
    pub const LAST_UPDATE: &str = "LastUpdate";
    pub const PROPOSAL_VALIDATE: &str = "ProposalValidate";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const COUNTRY: &str = "Country";
    pub const AREA_TAGS: &str = "AreaTags";
    pub const LAT: &str = "Lat";
    pub const LON: &str = "Lon";
    pub const DISTANCE: &str = "Distance";
    pub const IMAGES: &str = "Images";
    pub const ESTIMATED_VALUE: &str = "EstimatedValue";
    pub const EXPOSE_USER_DATA: &str = "ExposeUserData";
    pub const DATA_TO_SHARE: &str = "DataToShare";
    pub const RANKING: &str = "Ranking";

    pub const COLUMNS: [&str; 23] = [
        PROPOSAL_ID,
        USER_ID,
        TITLE,
        DESCRIPTION,
        SIDE,
        PROPOSAL_TYPE,
        TAGS,
        IS_ACTIVE,
        CREATED_AT,
        LAST_UPDATE,
        PROPOSAL_VALIDATE,
        CITY,
        STATE,
        COUNTRY,
        AREA_TAGS,
        LAT,
        LON,
        DISTANCE,
        IMAGES,
        ESTIMATED_VALUE,
        EXPOSE_USER_DATA,
        DATA_TO_SHARE,
        RANKING,
    ];
}

pub mod tag {
    pub const TAG: &str = "Tag";

    pub const COLUMNS: [&str; 1] = [TAG];
}

pub static USER_LAYOUT: ColumnLayout = ColumnLayout {
    kind: RecordKind::User,
    columns: &user::COLUMNS,
};

pub static PROPOSAL_LAYOUT: ColumnLayout = ColumnLayout {
    kind: RecordKind::Proposal,
    columns: &proposal::COLUMNS,
};

pub static TAG_LAYOUT: ColumnLayout = ColumnLayout {
    kind: RecordKind::Tag,
    columns: &tag::COLUMNS,
};
