use thiserror::Error;

use crate::graph::StarId;

/// Bad user input, caught before any request is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
	#[error("Please select a JSON file")]
	MissingFile,

	#[error("The selected file is empty")]
	EmptyFile,

	#[error("Please enter a valid star ID (got {0:?})")]
	InvalidStarId(String),

	#[error("Star {0} does not exist in the loaded graph")]
	UnknownStar(StarId),

	#[error("Invalid value for {field}: {value:?}")]
	InvalidEffect { field: &'static str, value: String },
}

/// Failure reported by, or while talking to, the simulation API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
	#[error("{detail} (HTTP {status})")]
	Status { status: u16, detail: String },

	#[error("{0}")]
	Rejected(String),

	#[error("Network error: {0}")]
	Transport(String),

	#[error("Malformed response: {0}")]
	Decode(String),
}

/// Referential integrity violations in an ingested graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	#[error("Star {0} appears more than once")]
	DuplicateStar(StarId),

	#[error("Edge {from}-{to} references a missing star")]
	DanglingEdge { from: StarId, to: StarId },

	#[error("Edge {from}-{to} has invalid distance {distance}")]
	NegativeDistance {
		from: StarId,
		to: StarId,
		distance: f64,
	},

	#[error("Star {0} belongs to no constellation")]
	NoConstellation(StarId),
}

/// Why an action was ignored. Never returned as an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
	#[error("no graph loaded")]
	NoGraph,

	#[error("no route calculated")]
	NoRoute,

	#[error("simulation is not running")]
	NotRunning,

	#[error("a simulation is in progress")]
	SimulationInProgress,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error(transparent)]
	Collaborator(#[from] ApiError),

	#[error("Invalid graph: {0}")]
	InvalidGraph(#[from] GraphError),
}

pub type ApiResult<T> = Result<T, ApiError>;

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_error_shows_detail_and_code() {
		let err = ApiError::Status {
			status: 400,
			detail: "Star 9 does not exist".into(),
		};
		assert_eq!(err.to_string(), "Star 9 does not exist (HTTP 400)");
	}

	#[test]
	fn rejected_error_is_the_server_message() {
		let err = SessionError::from(ApiError::Rejected("No viable route".into()));
		assert_eq!(err.to_string(), "No viable route");
		assert!(matches!(err, SessionError::Collaborator(_)));
	}

	#[test]
	fn validation_error_converts() {
		let err: SessionError = ValidationError::InvalidStarId("abc".into()).into();
		assert!(matches!(err, SessionError::Validation(_)));
		assert!(err.to_string().contains("valid star ID"));
	}

	#[test]
	fn graph_error_mentions_edge() {
		let err = SessionError::from(GraphError::DanglingEdge {
			from: StarId(1),
			to: StarId(8),
		});
		assert_eq!(err.to_string(), "Invalid graph: Edge 1-8 references a missing star");
	}
}
