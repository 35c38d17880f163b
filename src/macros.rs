macro_rules! s {
    ($s:expr) => {
        $s.to_string()
    };
}
