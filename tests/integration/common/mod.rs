pub mod mock_gemini;
pub mod test_server;
