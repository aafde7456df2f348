pub mod site;
pub mod storage;
pub mod tips;
pub mod trips;
pub mod whatsapp;
