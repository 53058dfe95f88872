pub mod smart_pointers;
