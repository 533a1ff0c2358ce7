//! User profile domain module.

mod model;

pub use model::{
    AgeGroup, BirthInfo, MAX_AGE, MIN_AGE, MIN_NAME_CHARS, Profile, validate_user_name,
};
