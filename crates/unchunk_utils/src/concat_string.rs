/// Concatenates `&str`-ish values without the `format!` machinery.
#[macro_export]
macro_rules! concat_string {
  ($($value:expr),+ $(,)?) => {{
    let mut out = String::with_capacity(0 $(+ AsRef::<str>::as_ref(&$value).len())+);
    $(
      out.push_str(AsRef::<str>::as_ref(&$value));
    )+
    out
  }};
}

#[test]
fn concats_mixed_str_sources() {
  let owned = String::from("b");
  assert_eq!(concat_string!("a", owned, "c"), "abc");
}
