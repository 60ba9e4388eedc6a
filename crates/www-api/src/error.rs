// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! API error response
//!

use crate::helpers::ErrorMsg;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lectern_core::MembershipError;
use lectern_crud::{CrudError, SessionError};
use log::warn;

/// Container for API errors.  Can be sent back to the client
#[derive(Debug)]
pub struct ApiError(pub (StatusCode, Json<ErrorMsg>));

impl ApiError {
    pub fn new<S: ToString>(status: StatusCode, error_msg: S) -> Self {
        ApiError((
            status,
            Json(ErrorMsg {
                error_msg: error_msg.to_string(),
            }),
        ))
    }

    pub fn status(&self) -> StatusCode {
        self.0.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(value: sqlx::Error) -> Self {
        let value: CrudError = value.into();
        value.into()
    }
}

impl From<CrudError> for ApiError {
    fn from(value: CrudError) -> Self {
        let status = match &value {
            error if error.is_not_found() => StatusCode::NOT_FOUND,
            CrudError::Title(_)
            | CrudError::VideoKey(_)
            | CrudError::Membership(_)
            | CrudError::IdNotSet(_) => StatusCode::BAD_REQUEST,
            CrudError::VideoKeyAlreadyInUse(_) | CrudError::NotUniqueInDb(_) => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("Internal error: {value}");
        }
        ApiError::new(status, value)
    }
}

impl From<MembershipError> for ApiError {
    fn from(value: MembershipError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, value)
    }
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::Load(error) => error.into(),
            SessionError::Validation(error) => error.into(),
            SessionError::SaveInFlight => ApiError::new(StatusCode::CONFLICT, value),
            SessionError::Save(_) | SessionError::Candidates(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, value)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lectern_core::{LecternId, TitleError};

    #[test]
    fn status_mapping() {
        let status = |error: CrudError| ApiError::from(error).status();
        assert_eq!(status(CrudError::LectureNotInDb), StatusCode::NOT_FOUND);
        assert_eq!(status(CrudError::MemberNotInDb), StatusCode::NOT_FOUND);
        assert_eq!(status(CrudError::Title(TitleError::Empty)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(CrudError::NotUniqueInDb(String::from("lecture_videos"))),
            StatusCode::CONFLICT
        );
        assert_eq!(status(CrudError::DbError), StatusCode::INTERNAL_SERVER_ERROR);

        let duplicate = MembershipError::DuplicateChild(LecternId::new());
        assert_eq!(ApiError::from(duplicate).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(SessionError::SaveInFlight).status(),
            StatusCode::CONFLICT
        );
    }
}
