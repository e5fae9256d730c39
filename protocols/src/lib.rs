pub mod mdns;
