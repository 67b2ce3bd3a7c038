use std::sync;

static INIT_TESTS: sync::Once = sync::Once::new();

pub fn init_logging() {
    INIT_TESTS.call_once(|| {
        pretty_env_logger::formatted_builder()
            .is_test(true)
            .parse_filters("trace")
            .init();
    });
}
