use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "debug_trace")] {
        macro_rules! trace {
            ( @write $text:expr ) => {
                println!("@write: {:?}", $text);
            };

            ( @value $ctx:expr, $escaped:expr ) => {
                println!("@value in {:?}: {:?}", $ctx, $escaped);
            };

            ( @context $ctx:expr ) => {
                println!("@context: {:?}", $ctx);
            };

            ( @pending $pending:expr ) => {
                println!("@pending: {:?}", $pending);
            };

            ( @recover $reason:expr ) => {
                println!("@recover: {}", $reason);
            };

            ( @substitute $scheme:expr ) => {
                println!("@substitute: disallowed URL scheme {:?}", $scheme);
            };

            ( @close ) => {
                println!("@close");
            };
        }
    } else {
        macro_rules! trace {
            ( $($args:tt)* ) => {};
        }
    }
}
