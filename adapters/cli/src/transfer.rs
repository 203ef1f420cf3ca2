#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gauntlet_core::{FighterId, LoadoutMap, RankMap};
use serde::{Deserialize, Serialize};

const BUILD_CODE_DOMAIN: &str = "gauntlet";
const BUILD_CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded build payload.
pub(crate) const BUILD_CODE_HEADER: &str = "gauntlet:v1";
/// Delimiter used to separate the prefix, member count and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of a party selection with its loadouts and rank overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PartyBuildSnapshot {
    /// Fighter ids composing the party, in slot order.
    pub party: Vec<FighterId>,
    /// Loadout selection per fighter.
    pub loadouts: LoadoutMap,
    /// Rank overrides per fighter and ability.
    pub ability_ranks: RankMap,
}

impl PartyBuildSnapshot {
    /// Encodes the snapshot into a single-line string suitable for clipboard
    /// transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableBuild {
            loadouts: self.loadouts.clone(),
            ability_ranks: self.ability_ranks.clone(),
            party: self.party.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("build snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{BUILD_CODE_HEADER}:{}:{encoded}", self.party.len())
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, BuildCodeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BuildCodeError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(BuildCodeError::MissingPrefix)?;
        let version = parts.next().ok_or(BuildCodeError::MissingVersion)?;
        let members = parts.next().ok_or(BuildCodeError::MissingMembers)?;
        let payload = parts.next().ok_or(BuildCodeError::MissingPayload)?;

        if domain != BUILD_CODE_DOMAIN {
            return Err(BuildCodeError::InvalidPrefix(domain.to_owned()));
        }
        if version != BUILD_CODE_VERSION {
            return Err(BuildCodeError::UnsupportedVersion(version.to_owned()));
        }

        let declared = parse_member_count(members)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(BuildCodeError::InvalidEncoding)?;
        let decoded: SerializableBuild =
            serde_json::from_slice(&bytes).map_err(BuildCodeError::InvalidPayload)?;

        if decoded.party.len() != declared {
            return Err(BuildCodeError::MemberCountMismatch {
                declared,
                found: decoded.party.len(),
            });
        }

        Ok(Self {
            party: decoded.party,
            loadouts: decoded.loadouts,
            ability_ranks: decoded.ability_ranks,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableBuild {
    party: Vec<FighterId>,
    loadouts: LoadoutMap,
    ability_ranks: RankMap,
}

/// Errors that can occur while decoding build-code strings.
#[derive(Debug)]
pub(crate) enum BuildCodeError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded build.
    MissingPrefix,
    /// The encoded build did not contain a version segment.
    MissingVersion,
    /// The encoded build did not include the member count.
    MissingMembers,
    /// The encoded build did not include the payload segment.
    MissingPayload,
    /// The encoded build used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded build used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The member count could not be parsed from the encoded build.
    InvalidMembers(String),
    /// The declared member count disagrees with the decoded party.
    MemberCountMismatch {
        /// Count declared in the envelope.
        declared: usize,
        /// Count actually present in the payload.
        found: usize,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for BuildCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "build code was empty"),
            Self::MissingPrefix => write!(f, "build code is missing the prefix"),
            Self::MissingVersion => write!(f, "build code is missing the version"),
            Self::MissingMembers => write!(f, "build code is missing the member count"),
            Self::MissingPayload => write!(f, "build code is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "build code prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "build code version '{version}' is not supported")
            }
            Self::InvalidMembers(members) => {
                write!(f, "could not parse member count '{members}'")
            }
            Self::MemberCountMismatch { declared, found } => {
                write!(
                    f,
                    "build code declares {declared} members but carries {found}"
                )
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode build payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse build payload: {error}")
            }
        }
    }
}

impl Error for BuildCodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_member_count(members: &str) -> Result<usize, BuildCodeError> {
    let count = members
        .trim()
        .parse::<usize>()
        .map_err(|_| BuildCodeError::InvalidMembers(members.to_owned()))?;

    if count == 0 {
        return Err(BuildCodeError::InvalidMembers(members.to_owned()));
    }

    Ok(count)
}
