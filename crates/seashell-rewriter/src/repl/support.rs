/// Prototype patches that must run once per execution realm before any
/// rewritten code. Cursor builder methods are forwarded through promises so
/// a cursor behaves the same whether or not the call producing it was
/// awaited. Guarded by a registered symbol so re-evaluation is a no-op.
pub fn runtime_support_code() -> &'static str {
    r#"(() => {
  const installed = Symbol.for('@@seashell/cursorForwarding');
  if (Promise.prototype[installed]) {
    return;
  }
  Object.defineProperty(Promise.prototype, installed, { value: true });
  const names = ['sort', 'limit', 'skip', 'projection', 'batchSize', 'maxTimeMS'];
  const forward = (name) => {
    return function () {
      const args = Array.prototype.slice.call(arguments);
      return this.then(function (cursor) {
        return cursor[name].apply(cursor, args);
      });
    };
  };
  for (let i = 0; i < names.length; i++) {
    if (!Promise.prototype[names[i]]) {
      Object.defineProperty(Promise.prototype, names[i], {
        writable: true,
        configurable: true,
        value: forward(names[i]),
      });
    }
  }
})();
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_code_is_stable_and_selfcontained() {
        let code = runtime_support_code();
        assert!(code.contains("Promise.prototype"));
        // same static text on every call
        assert_eq!(code, runtime_support_code());
    }
}
