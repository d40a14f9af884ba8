//! Host-based scenario tests for the ESP32 OTA updater
//! These tests run on the development machine, not on the ESP32
