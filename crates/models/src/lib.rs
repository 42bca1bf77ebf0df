pub mod errors;
pub mod db;
pub mod drug;

#[cfg(test)]
mod tests;
