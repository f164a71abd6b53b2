mod test_ws_rendezvous;
