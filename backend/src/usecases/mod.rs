pub mod checkout;
pub mod confirmations;
pub mod descriptions;
pub mod downloads;
pub mod processing;
pub mod projects;
pub mod status_reflector;
pub mod uploads;

#[cfg(test)]
pub mod test_fixtures;
