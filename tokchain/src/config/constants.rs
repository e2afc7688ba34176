pub mod compile_time {
    pub mod dump {
        /// Maximum dump file size accepted by the reader (16MB)
        /// SECURITY: Prevents DoS via oversized inputs
        pub const MAX_DUMP_FILE_SIZE: u64 = 16 * 1024 * 1024;

        /// Maximum number of tokens a single dump may produce
        /// SECURITY: Prevents DoS via token explosion
        pub const MAX_TOKEN_COUNT: usize = 1_000_000;

        /// Maximum bracket nesting depth tracked while linking
        /// RESOURCE: Bounds the opener stack
        pub const MAX_BRACKET_DEPTH: usize = 10_000;
    }

    pub mod logging {
        /// Maximum log message length
        /// RESOURCE: Prevents memory growth via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
