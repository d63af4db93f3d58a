//! Party API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::constants::MAX_TITLE_LEN;
use crate::data::types::{LeaderboardEntry, MemberWithUser, MembershipRow};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePartyRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LEN, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Defaults to 50
    #[validate(range(min = 1, max = 500, message = "max_members must be 1-500"))]
    pub max_members: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinPartyRequest {
    #[validate(length(min = 1, max = 32, message = "Invite code must be 1-32 characters"))]
    pub invite_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JoinPartyResponse {
    pub membership: MembershipRow,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeavePartyResponse {
    pub left: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MembersResponse {
    pub members: Vec<MemberWithUser>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}
