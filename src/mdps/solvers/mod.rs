pub mod policy_iteration;
pub mod value_iteration;
