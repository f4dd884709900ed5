use std::collections::BTreeSet;
use std::io::Cursor;

use super::call::TraceCall;
use super::reader::{read_trace, write_calls};
use super::value::Value;

#[test]
fn missing_arguments_read_as_null() {
    let call = TraceCall::new(4, "glBindBuffer").with_arg("target", 0x8892u32);
    assert_eq!(call.arg(0).to_u32(), 0x8892);
    assert!(call.arg(1).is_null());
    assert_eq!(call.arg(1).to_uint(), 0);
    assert!(call.ret_value().is_null());
    assert_eq!(call.find_arg("target"), Some(0));
    assert_eq!(call.find_arg("buffer"), None);
}

#[test]
fn method_name_strips_interface() {
    assert_eq!(
        TraceCall::new(1, "ID3D11DeviceContext::Draw").method_name(),
        "Draw"
    );
    assert_eq!(TraceCall::new(1, "glDrawArrays").method_name(), "glDrawArrays");
}

#[test]
fn out_parameter_helpers() {
    let v = Value::out_pointer(0xbeef);
    assert_eq!(v.first_element().map(Value::to_pointer), Some(0xbeef));
    assert_eq!(Value::SInt(-1).to_uint(), u64::MAX);
    assert_eq!(Value::Blob(vec![0; 12]).blob_len(), Some(12));
    assert!(Value::Null.as_array().is_none());
}

#[test]
fn reads_json_lines_and_skips_comments() {
    let text = r#"
# recorded with a test tracer
{"no": 0, "name": "glGenBuffers", "args": [{"name": "n", "value": {"sint": 1}}, {"name": "buffers", "value": {"array": [{"uint": 1}]}}]}

{"no": 1, "name": "glXSwapBuffers", "flags": {"end_frame": true}, "thread_id": 2}
"#;
    let calls = read_trace(Cursor::new(text))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].arg(1).as_array().unwrap()[0].to_uint(), 1);
    assert!(calls[1].is_end_frame());
    assert_eq!(calls[1].thread_id, 2);
}

#[test]
fn bad_line_reports_its_number() {
    let text = "{\"no\": 0, \"name\": \"glFlush\"}\nnot json\n";
    let results: Vec<_> = read_trace(Cursor::new(text)).collect();
    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert!(err.to_string().contains("trace line 2"), "{err}");
}

#[test]
fn writes_only_kept_calls_in_input_order() {
    let calls = vec![
        TraceCall::new(0, "glFlush"),
        TraceCall::new(1, "glFinish"),
        TraceCall::new(2, "glClear").with_arg("mask", 0x4000u32),
    ];
    let keep: BTreeSet<u64> = [2, 0].into_iter().collect();
    let mut out = Vec::new();
    let n = write_calls(&mut out, &calls, &keep).unwrap();
    assert_eq!(n, 2);

    let back = read_trace(Cursor::new(out))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(back, vec![calls[0].clone(), calls[2].clone()]);
}
