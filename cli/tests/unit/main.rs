//! Unit test harness for piclaw application services.
//!
//! Services are exercised through hand-written port mocks from `helpers`;
//! filesystem effects land in temporary directories.

mod helpers;
mod interview_service;
mod registrar_service;
mod sequencer_service;
