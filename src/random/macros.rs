/// Use this to define a unique type which names an independent random stream. Each stream
/// is seeded from the run's base seed offset by a hash of the stream name, see
/// [`RandomSource::for_stream`](crate::random::RandomSource::for_stream).
#[macro_export]
macro_rules! define_rng {
    ($random_id:ident) => {
        #[derive(Copy, Clone)]
        struct $random_id;

        impl $crate::random::RngId for $random_id {
            fn get_name() -> &'static str {
                stringify!($random_id)
            }
        }
    };
}
pub use define_rng;
