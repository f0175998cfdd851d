use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role reported by the backend. Unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleTag {
    SuperAdmin,
    EventOrganizer,
    Communicant,
    ScientificCommittee,
    GuestSpeaker,
    WorkshopAnimator,
    Participant,
    Unrecognized(String),
}

impl RoleTag {
    /// Role assumed when the login response names none.
    pub const FALLBACK: RoleTag = RoleTag::Participant;

    pub fn parse(tag: &str) -> Self {
        match tag {
            "super_admin" => RoleTag::SuperAdmin,
            "event_organizer" => RoleTag::EventOrganizer,
            "communicant" => RoleTag::Communicant,
            "scientific_committee" => RoleTag::ScientificCommittee,
            "guest_speaker" => RoleTag::GuestSpeaker,
            "workshop_animator" => RoleTag::WorkshopAnimator,
            "participant" => RoleTag::Participant,
            other => RoleTag::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoleTag::SuperAdmin => "super_admin",
            RoleTag::EventOrganizer => "event_organizer",
            RoleTag::Communicant => "communicant",
            RoleTag::ScientificCommittee => "scientific_committee",
            RoleTag::GuestSpeaker => "guest_speaker",
            RoleTag::WorkshopAnimator => "workshop_animator",
            RoleTag::Participant => "participant",
            RoleTag::Unrecognized(raw) => raw.as_str(),
        }
    }
}

impl Default for RoleTag {
    fn default() -> Self { RoleTag::FALLBACK }
}

impl Display for RoleTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RoleTag {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoleTag {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(RoleTag::parse(&raw))
    }
}

/// Navigation destinations known to the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoutePath {
    #[serde(rename = "/Superadmin")]
    SuperAdmin,
    #[serde(rename = "/organizer")]
    Organizer,
    #[serde(rename = "/DashboardContent")]
    AuthorDashboard,
    #[serde(rename = "/cs")]
    ScientificCommittee,
    #[serde(rename = "/event")]
    Event,
    #[serde(rename = "/WorkshopDetailedPage")]
    Workshop,
    #[serde(rename = "/participant")]
    Participant,
    #[serde(rename = "/login")]
    Login,
}

impl RoutePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutePath::SuperAdmin => "/Superadmin",
            RoutePath::Organizer => "/organizer",
            RoutePath::AuthorDashboard => "/DashboardContent",
            RoutePath::ScientificCommittee => "/cs",
            RoutePath::Event => "/event",
            RoutePath::Workshop => "/WorkshopDetailedPage",
            RoutePath::Participant => "/participant",
            RoutePath::Login => "/login",
        }
    }
}

impl Display for RoutePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a freshly logged-in user lands. Total over every role, including
/// tags this client does not know about.
pub fn resolve_destination(role: &RoleTag) -> RoutePath {
    match role {
        RoleTag::SuperAdmin => RoutePath::SuperAdmin,
        RoleTag::EventOrganizer => RoutePath::Organizer,
        RoleTag::Communicant => RoutePath::AuthorDashboard,
        RoleTag::ScientificCommittee => RoutePath::ScientificCommittee,
        RoleTag::GuestSpeaker => RoutePath::Event,
        RoleTag::WorkshopAnimator => RoutePath::Workshop,
        RoleTag::Participant | RoleTag::Unrecognized(_) => RoutePath::Participant,
    }
}
