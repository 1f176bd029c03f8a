fn main() {
    // Emits the ESP-IDF cargo metadata when building with the espidf
    // feature; host test builds skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
