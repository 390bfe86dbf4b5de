//! Property Tests: XML Tree Writer
//!
//! Random sequences of lines, nest opens and nest closes (never closing more
//! than is open) must always produce a well-formed document with a single
//! `logfile` root, whether or not the sequence leaves nests open at close.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use testlog::logging::{Attributes, MemorySink, XmlTreeWriter};

    #[derive(Debug, Clone)]
    enum Op {
        Line(String, Option<String>),
        Open(String),
        Close,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (any::<String>(), proptest::option::of(any::<String>()))
                .prop_map(|(msg, machine)| Op::Line(msg, machine)),
            1 => any::<String>().prop_map(Op::Open),
            1 => Just(Op::Close),
        ]
    }

    /// (root element count, max depth) of a document, failing on malformed input
    fn check(xml: &str) -> Result<(usize, usize), String> {
        let mut reader = Reader::from_str(xml);
        reader.check_end_names(true);
        let (mut roots, mut depth, mut max_depth) = (0, 0usize, 0);
        loop {
            match reader.read_event().map_err(|e| e.to_string())? {
                Event::Start(_) => {
                    if depth == 0 {
                        roots += 1;
                    }
                    depth += 1;
                    max_depth = max_depth.max(depth);
                }
                Event::Empty(_) if depth == 0 => roots += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => break,
                _ => {}
            }
        }
        if depth != 0 {
            return Err(format!("{} elements left open", depth));
        }
        Ok((roots, max_depth))
    }

    proptest! {
        #[test]
        fn test_document_always_well_formed(ops in prop::collection::vec(op(), 0..40)) {
            let sink = MemorySink::new();
            let mut writer = XmlTreeWriter::new(sink.destination()).unwrap();
            let mut open = 0usize;
            for op in &ops {
                match op {
                    Op::Line(msg, machine) => {
                        let attrs = match machine {
                            Some(m) => Attributes::machine(m),
                            None => Attributes::new(),
                        };
                        writer.write_line(msg, &attrs).unwrap();
                    }
                    Op::Open(head) => {
                        writer.open_nest(head, &Attributes::new()).unwrap();
                        open += 1;
                    }
                    Op::Close if open > 0 => {
                        writer.close_nest().unwrap();
                        open -= 1;
                    }
                    Op::Close => {}
                }
                prop_assert_eq!(writer.depth(), open);
            }
            writer.close().unwrap();

            let xml = sink.contents();
            let (roots, _) = check(&xml).map_err(TestCaseError::fail)?;
            prop_assert_eq!(roots, 1);
            prop_assert!(xml.ends_with("</logfile>\n"));
        }
    }
}
