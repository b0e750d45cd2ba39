use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A library patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Assigned by the store on insert
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all users
    pub email: String,
    #[schema(value_type = String, format = Date, example = "1990-03-10")]
    pub date_of_birth: NaiveDate,
}

impl User {
    /// Whole years since `date_of_birth`, as of today (UTC).
    pub fn age(&self) -> u32 {
        self.age_on(Utc::now().date_naive())
    }

    /// Whole years since `date_of_birth` on `date`; 0 for birth dates after `date`.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        date.years_since(self.date_of_birth).unwrap_or(0)
    }
}

/// User as returned by the API, with the derived age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(value_type = String, format = Date, example = "1990-03-10")]
    pub date_of_birth: NaiveDate,
    #[schema(example = 35)]
    pub age: u32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let age = user.age();
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            date_of_birth: user.date_of_birth,
            age,
        }
    }
}

/// Body of `POST /library/user`.
///
/// The email is not checked here; `UserService::add_user` owns the email rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Rafał")]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Nowak")]
    pub last_name: String,
    #[schema(example = "rafiki@gmail.com")]
    pub email: String,
    #[schema(value_type = String, format = Date, example = "1990-03-10")]
    pub date_of_birth: NaiveDate,
}

/// Query parameters of `PUT /library/user/{id}`. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    /// Ignored when it is not a well-formed address
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rafal() -> User {
        User {
            id: 1,
            first_name: "Rafał".into(),
            last_name: "Nowak".into(),
            email: "rafiki@gmail.com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 10).unwrap(),
        }
    }

    #[test]
    fn age_counts_whole_years() {
        let user = rafal();
        let day_before = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        assert_eq!(user.age_on(day_before), 33);
        assert_eq!(user.age_on(birthday), 34);
    }

    #[test]
    fn age_of_future_birth_date_is_zero() {
        let user = rafal();
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()), 0);
    }

    #[test]
    fn user_serializes_in_camel_case() {
        let json = serde_json::to_value(rafal()).unwrap();
        assert_eq!(json["firstName"], "Rafał");
        assert_eq!(json["lastName"], "Nowak");
        assert_eq!(json["dateOfBirth"], "1990-03-10");
    }

    #[test]
    fn response_carries_age() {
        let user = rafal();
        let expected = user.age();
        let response = UserResponse::from(user);
        assert_eq!(response.age, expected);
        assert_eq!(response.id, 1);
    }

    #[test]
    fn create_user_requires_names() {
        let input = CreateUser {
            first_name: String::new(),
            last_name: "Nowak".into(),
            email: "not-checked-here".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 10).unwrap(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
        assert!(!errors.field_errors().contains_key("email"));
    }

    #[test]
    fn update_user_validates_only_present_fields() {
        assert!(UpdateUser::default().validate().is_ok());

        let blank = UpdateUser {
            last_name: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }
}
