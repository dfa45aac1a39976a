/// Single page served at `/`
///
/// Connects on load, renders `/api/state` responses, and posts the form
/// actions back to the JSON API.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Vault</title>
  <style>
    body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
    dt { font-weight: bold; margin-top: 0.5rem; }
    #error { color: #b00020; white-space: pre-wrap; }
    button:disabled { opacity: 0.5; }
  </style>
</head>
<body>
  <h1>Time-Locked Vault</h1>
  <p>Contract: <code id="contract"></code></p>

  <dl>
    <dt>Account</dt><dd id="account"></dd>
    <dt>ETH Balance</dt><dd id="balance"></dd>
    <dt>Governance Tokens</dt><dd id="tokens"></dd>
    <dt>Deposit Timestamp</dt><dd id="deposit-timestamp"></dd>
    <dt>Unlock Date</dt><dd id="unlock-date"></dd>
  </dl>

  <p id="error"></p>

  <input id="amount" type="text" placeholder="Amount in ETH">
  <button id="deposit">Deposit</button>
  <button id="withdraw">Withdraw</button>

  <script>
    const $ = (id) => document.getElementById(id);

    function render(state) {
      $("contract").textContent = state.contract_address;
      $("account").textContent = state.account || "Not connected";
      $("balance").textContent = state.balance;
      $("tokens").textContent = state.governance_tokens;
      $("deposit-timestamp").textContent = state.deposit_timestamp;
      $("unlock-date").textContent = state.unlock_date;
      $("error").textContent = state.error || "";
      if (document.activeElement !== $("amount")) {
        $("amount").value = state.amount;
      }
      $("deposit").disabled = state.busy.deposit;
      $("withdraw").disabled = state.busy.withdraw;
    }

    async function call(method, path, body) {
      const options = { method, headers: { "Content-Type": "application/json" } };
      if (body !== undefined) {
        options.body = JSON.stringify(body);
      }
      const response = await fetch(path, options);
      const payload = await response.json();
      const state = response.ok ? payload : payload.state;
      render(state);
      if (state.notice) {
        alert(state.notice);
        return call("POST", "/api/notice/dismiss");
      }
      return state;
    }

    async function transact(path, button) {
      button.disabled = true;
      await call("POST", path, { amount: $("amount").value });
    }

    $("amount").addEventListener("change", () =>
      call("POST", "/api/amount", { amount: $("amount").value }));
    $("deposit").addEventListener("click", () => transact("/api/deposit", $("deposit")));
    $("withdraw").addEventListener("click", () => transact("/api/withdraw", $("withdraw")));

    window.addEventListener("load", () => call("POST", "/api/connect"));
  </script>
</body>
</html>
"#;
