pub mod training_record;
