//! Mock upstream providers
//!
//! Wiremock servers standing in for Gemini, SiliconFlow and Hugging Face.
