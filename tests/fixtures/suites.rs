use crate::harness::{chunk_size, get_tests};

// NOTE: each test is rendered with a few random chunk sizes per encoding, unless
// CHUNK_SIZE is set.
const ITERATIONS: usize = 3;

#[test]
fn data_driven_suites() {
    for test in get_tests() {
        let len = test.template.source().len();

        for encoding in test.encodings() {
            let expected = test.expected_output(encoding);

            for _ in 0..ITERATIONS {
                let chunk_size = chunk_size(len);
                let actual = test
                    .template
                    .render(test.settings(encoding), chunk_size)
                    .unwrap();

                assert_eql!(
                    actual,
                    expected,
                    test.template.source(),
                    chunk_size,
                    format!("{} ({})", test.description, encoding.name())
                );
            }
        }
    }
}
