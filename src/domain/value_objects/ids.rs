use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

id_type!(JobId);
id_type!(VehicleId);
id_type!(TaskId);
// Company/branch a record is scoped to.
id_type!(ScopeId);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! id_unique_test {
        ($name:ident, $test_name:ident) => {
            #[test]
            fn $test_name() {
                let result = $name::new();
                assert_ne!(result, $name::new())
            }
        };
    }

    id_unique_test!(JobId, given_new_job_id_when_generated_should_be_unique);
    id_unique_test!(
        VehicleId,
        given_new_vehicle_id_when_generated_should_be_unique
    );
    id_unique_test!(TaskId, given_new_task_id_when_generated_should_be_unique);
    id_unique_test!(ScopeId, given_new_scope_id_when_generated_should_be_unique);

    #[test]
    fn given_id_string_with_whitespace_when_parsed_should_match_display() {
        let id = JobId::new();
        let parsed: JobId = format!("  {id} ").parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn given_garbage_when_parsed_should_fail() {
        assert!("not-an-id".parse::<VehicleId>().is_err());
    }
}
