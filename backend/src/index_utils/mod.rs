pub mod typesense_utils;
