//! Scripts evaluated in the recorded page.
//!
//! [`INSTALL_LISTENERS`] is registered to run at the start of every document, and is also
//! evaluated on each poll to cover the document that was already loaded when recording began.
//! It installs capture-phase listeners that append records to a queue kept in
//! `sessionStorage`, so records pushed just before a same-tab navigation (a submit button, a
//! link) are still there for the next drain. [`DRAIN_QUEUE`] empties that queue and returns it.
//!
//! Stage shortcuts (`Ctrl+Alt+G`, `Ctrl+Alt+W`, `Ctrl+Alt+T`) go through the same queue so they
//! stay ordered relative to the interactions around them. An element the pointer rests on for
//! 5 seconds is queued as a `hover` record; leaving it earlier cancels the timer.

pub const INSTALL_LISTENERS: &str = r"(() => {
  const w = window;
  if (w.__gwtInstalled) {
    return;
  }
  w.__gwtInstalled = true;
  const KEY = '__gwtQueue';
  const HOVER_MS = 5000;
  const append = (record) => {
    record.url = location.href;
    try {
      const queued = JSON.parse(w.sessionStorage.getItem(KEY) || '[]');
      queued.push(record);
      w.sessionStorage.setItem(KEY, JSON.stringify(queued));
    } catch (err) {
      (w.__gwtFallback = w.__gwtFallback || []).push(record);
    }
  };
  const target = (event) => {
    const el = event.target;
    return el && typeof el.outerHTML === 'string' ? el : null;
  };
  document.addEventListener('click', (event) => {
    const el = target(event);
    if (el) {
      append({ kind: 'click', markup: el.outerHTML });
    }
  }, true);
  document.addEventListener('change', (event) => {
    const el = target(event);
    if (el && 'value' in el) {
      append({ kind: 'input', markup: el.outerHTML, value: String(el.value ?? '') });
    }
  }, true);
  document.addEventListener('keydown', (event) => {
    if (!event.ctrlKey || !event.altKey) {
      return;
    }
    const stage = { KeyG: 'given', KeyW: 'when', KeyT: 'then' }[event.code];
    if (stage) {
      event.preventDefault();
      append({ stage });
    }
  }, true);
  let hoverTimer = null;
  document.addEventListener('mouseover', (event) => {
    clearTimeout(hoverTimer);
    const el = target(event);
    hoverTimer = el ? setTimeout(() => append({ kind: 'hover', markup: el.outerHTML }), HOVER_MS) : null;
  }, true);
  document.addEventListener('mouseout', () => {
    clearTimeout(hoverTimer);
    hoverTimer = null;
  }, true);
})()";

pub const DRAIN_QUEUE: &str = r"(() => {
  const w = window;
  const KEY = '__gwtQueue';
  let drained = [];
  try {
    drained = JSON.parse(w.sessionStorage.getItem(KEY) || '[]');
    w.sessionStorage.removeItem(KEY);
  } catch (err) {
    drained = [];
  }
  return drained.concat((w.__gwtFallback || []).splice(0));
})()";
